use serde::{Deserialize, Serialize};

use super::markup::{
    parse_markup, plain_text, raw_tag_name, render, Attributes, Segment, TagNode,
};
use super::registry::TagRegistry;
use super::Utterance;
use crate::error::EditError;

/// Byte range over an utterance's visible text (markup excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TagOutcome {
    Added,
    Updated,
}

/// Applies and removes registry tags on utterance text.
pub struct Annotator<'r> {
    registry: &'r TagRegistry,
}

impl<'r> Annotator<'r> {
    pub fn new(registry: &'r TagRegistry) -> Self {
        Self { registry }
    }

    /// Wrap `selection` in `tag`, or merge `attributes` into the innermost
    /// `tag` span that already covers it. Self-closing tags are placed at the
    /// end of the selection.
    pub fn apply_tag(
        &self,
        utterance: &mut Utterance,
        selection: Selection,
        tag: &str,
        attributes: &Attributes,
    ) -> Result<TagOutcome, EditError> {
        let definition = self
            .registry
            .lookup(tag)
            .ok_or_else(|| EditError::UnknownTag(tag.to_string()))?;
        for (name, value) in attributes.iter() {
            definition.validate(name, value)?;
        }

        let mut segments = parse_markup(&utterance.text);
        check_selection(&plain_text(&segments), selection, definition.empty)?;

        let outcome = if definition.empty {
            match marker_path(&segments, 0, selection.end, tag) {
                Some(path) => {
                    merge_at(&mut segments, &path, attributes);
                    TagOutcome::Updated
                }
                None => {
                    let node = TagNode::new(tag, attributes.clone(), true);
                    insert_marker(&mut segments, 0, selection.end, node);
                    TagOutcome::Added
                }
            }
        } else {
            match enclosing_path(&segments, 0, selection, tag) {
                Some(path) => {
                    merge_at(&mut segments, &path, attributes);
                    TagOutcome::Updated
                }
                None => {
                    let node = TagNode::new(tag, attributes.clone(), false);
                    wrap(&mut segments, 0, selection, node)?;
                    TagOutcome::Added
                }
            }
        };

        utterance.text = render(&segments);
        tracing::debug!(tag, ?outcome, speaker = %utterance.speaker, "tag applied");
        Ok(outcome)
    }

    /// Attributes of the existing `tag` span covering `selection`, if any.
    pub fn find_span(
        &self,
        utterance: &Utterance,
        tag: &str,
        selection: Selection,
    ) -> Option<Attributes> {
        let segments = parse_markup(&utterance.text);
        let empty = self.registry.lookup(tag).map_or(false, |d| d.empty);
        let path = if empty {
            marker_path(&segments, 0, selection.end, tag)
        } else {
            enclosing_path(&segments, 0, selection, tag)
        }?;
        node_at(&segments, &path).map(|node| node.attributes().clone())
    }

    /// Unwrap every `tag` span, keeping its content.
    pub fn remove_tag(&self, utterance: &mut Utterance, tag: &str) -> Result<usize, EditError> {
        match self.remove_tags(utterance, &[tag]) {
            0 => Err(EditError::NotFound(tag.to_string())),
            removed => Ok(removed),
        }
    }

    /// Unwrap every span named in `tags` in one pass. Returns how many went.
    pub fn remove_tags(&self, utterance: &mut Utterance, tags: &[&str]) -> usize {
        let mut removed = 0;
        let segments = unwrap_tags(parse_markup(&utterance.text), tags, &mut removed);
        if removed > 0 {
            utterance.text = render(&segments);
        }
        removed
    }
}

pub fn toggle_pause(utterance: &mut Utterance) {
    utterance.add_pause = !utterance.add_pause;
}

pub fn rename_speaker(utterance: &mut Utterance, name: &str) -> Result<(), EditError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EditError::InvalidName);
    }
    utterance.speaker = name.to_string();
    Ok(())
}

/// First occurrence of `needle` in the visible text.
pub fn select(utterance: &Utterance, needle: &str) -> Option<Selection> {
    if needle.is_empty() {
        return None;
    }
    let visible = utterance.visible_text();
    visible
        .find(needle)
        .map(|start| Selection::new(start, start + needle.len()))
}

fn check_selection(visible: &str, selection: Selection, allow_empty: bool) -> Result<(), EditError> {
    if selection.start > selection.end || selection.end > visible.len() {
        return Err(EditError::InvalidSelection(format!(
            "{}..{} is outside the text ({} bytes)",
            selection.start,
            selection.end,
            visible.len()
        )));
    }
    if selection.is_empty() && !allow_empty {
        return Err(EditError::InvalidSelection("nothing selected".to_string()));
    }
    if !visible.is_char_boundary(selection.start) || !visible.is_char_boundary(selection.end) {
        return Err(EditError::InvalidSelection(
            "selection splits a character".to_string(),
        ));
    }
    Ok(())
}

fn enclosing_path(
    segments: &[Segment],
    base: usize,
    selection: Selection,
    tag: &str,
) -> Option<Vec<usize>> {
    let mut offset = base;
    for (index, segment) in segments.iter().enumerate() {
        let len = segment.visible_len();
        let (start, end) = (offset, offset + len);
        offset = end;

        let Segment::Tag(node) = segment else {
            continue;
        };
        if len == 0 || selection.start < start || end < selection.end {
            continue;
        }
        if let Some(mut inner) = enclosing_path(&node.children, start, selection, tag) {
            inner.insert(0, index);
            return Some(inner);
        }
        if node.name == tag {
            return Some(vec![index]);
        }
    }
    None
}

fn marker_path(segments: &[Segment], base: usize, position: usize, tag: &str) -> Option<Vec<usize>> {
    let mut offset = base;
    for (index, segment) in segments.iter().enumerate() {
        let len = segment.visible_len();
        let (start, end) = (offset, offset + len);
        offset = end;

        let Segment::Tag(node) = segment else {
            continue;
        };
        if len == 0 && start == position && node.name == tag {
            return Some(vec![index]);
        }
        if start <= position && position <= end {
            if let Some(mut inner) = marker_path(&node.children, start, position, tag) {
                inner.insert(0, index);
                return Some(inner);
            }
        }
    }
    None
}

fn node_at<'a>(segments: &'a [Segment], path: &[usize]) -> Option<&'a TagNode> {
    let (first, rest) = path.split_first()?;
    match segments.get(*first)? {
        Segment::Tag(node) if rest.is_empty() => Some(node),
        Segment::Tag(node) => node_at(&node.children, rest),
        _ => None,
    }
}

fn merge_at(segments: &mut [Segment], path: &[usize], attributes: &Attributes) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if let Some(Segment::Tag(node)) = segments.get_mut(*first) {
        if rest.is_empty() {
            node.merge_attributes(attributes);
        } else {
            merge_at(&mut node.children, rest, attributes);
        }
    }
}

fn wrap(
    segments: &mut Vec<Segment>,
    base: usize,
    selection: Selection,
    mut node: TagNode,
) -> Result<(), EditError> {
    let mut offset = base;
    for index in 0..segments.len() {
        let len = segments[index].visible_len();
        let (start, end) = (offset, offset + len);
        offset = end;

        if let Segment::Tag(child) = &mut segments[index] {
            if len == 0 {
                continue;
            }
            let exact = start == selection.start && end == selection.end;
            if start <= selection.start && selection.end <= end && !exact {
                return wrap(&mut child.children, start, selection, node);
            }
            let crosses_start = start < selection.start && selection.start < end;
            let crosses_end = start < selection.end && selection.end < end;
            if crosses_start || crosses_end {
                return Err(EditError::InvalidSelection(format!(
                    "selection crosses the boundary of <{}>",
                    child.name
                )));
            }
        }
    }

    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut offset = base;
    for segment in segments.drain(..) {
        let len = segment.visible_len();
        let (start, end) = (offset, offset + len);
        offset = end;

        match segment {
            Segment::Text(text) => {
                let cut_start = selection.start.clamp(start, end) - start;
                let cut_end = selection.end.clamp(start, end) - start;
                if cut_start > 0 {
                    before.push(Segment::Text(text[..cut_start].to_string()));
                }
                if cut_end > cut_start {
                    node.children
                        .push(Segment::Text(text[cut_start..cut_end].to_string()));
                }
                if len > cut_end {
                    after.push(Segment::Text(text[cut_end..].to_string()));
                }
            }
            other => {
                let inside = if len == 0 {
                    selection.start < start && start < selection.end
                } else {
                    selection.start < end && start < selection.end
                };
                if !inside {
                    if start <= selection.start {
                        before.push(other);
                    } else {
                        after.push(other);
                    }
                } else if unpaired(&other, &node.name) {
                    return Err(EditError::InvalidSelection(format!(
                        "selection contains unpaired <{}> markup",
                        node.name
                    )));
                } else {
                    node.children.push(other);
                }
            }
        }
    }

    segments.extend(before);
    segments.push(Segment::Tag(node));
    segments.extend(after);
    Ok(())
}

/// Stray markup with the new tag's name would pair up with it on the next
/// parse.
fn unpaired(segment: &Segment, tag: &str) -> bool {
    match segment {
        Segment::Raw(source) => raw_tag_name(source) == Some(tag),
        Segment::Tag(node) => node.children.iter().any(|child| unpaired(child, tag)),
        Segment::Text(_) => false,
    }
}

fn insert_marker(segments: &mut Vec<Segment>, base: usize, position: usize, node: TagNode) {
    let mut offset = base;
    for index in 0..segments.len() {
        let len = segments[index].visible_len();
        let (start, end) = (offset, offset + len);
        offset = end;

        if start >= position {
            segments.insert(index, Segment::Tag(node));
            return;
        }
        if position < end {
            match &mut segments[index] {
                Segment::Tag(child) => {
                    insert_marker(&mut child.children, start, position, node);
                }
                Segment::Text(text) => {
                    let tail = text.split_off(position - start);
                    segments.splice(
                        index + 1..index + 1,
                        [Segment::Tag(node), Segment::Text(tail)],
                    );
                }
                Segment::Raw(_) => {}
            }
            return;
        }
    }
    segments.push(Segment::Tag(node));
}

fn unwrap_tags(segments: Vec<Segment>, tags: &[&str], removed: &mut usize) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Tag(mut node) => {
                let children = unwrap_tags(std::mem::take(&mut node.children), tags, removed);
                if tags.contains(&node.name.as_str()) {
                    *removed += 1;
                    out.extend(children);
                } else {
                    node.children = children;
                    out.push(Segment::Tag(node));
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssml::markup::spans;

    fn annotator() -> Annotator<'static> {
        Annotator::new(TagRegistry::standard())
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    fn apply(u: &mut Utterance, needle: &str, tag: &str, pairs: &[(&str, &str)]) -> Result<TagOutcome, EditError> {
        let selection = select(u, needle).expect("needle present");
        annotator().apply_tag(u, selection, tag, &attrs(pairs))
    }

    #[test]
    fn wraps_selected_text() {
        let mut u = Utterance::new("Alice", "Hello there");
        let outcome = apply(&mut u, "there", "prosody", &[("rate", "slow")]).unwrap();
        assert_eq!(outcome, TagOutcome::Added);
        assert_eq!(u.text, r#"Hello <prosody rate="slow">there</prosody>"#);
    }

    #[test]
    fn updates_an_enclosing_span_in_place() {
        let mut u = Utterance::new("Alice", r#"Hello <prosody rate="slow">there friend</prosody>"#);
        let outcome = apply(&mut u, "friend", "prosody", &[("rate", "fast"), ("pitch", "high")]).unwrap();
        assert_eq!(outcome, TagOutcome::Updated);
        assert_eq!(
            u.text,
            r#"Hello <prosody rate="fast" pitch="high">there friend</prosody>"#
        );
    }

    #[test]
    fn nests_inside_a_different_tag() {
        let mut u = Utterance::new("Bob", r#"<prosody rate="slow">one two three</prosody>"#);
        apply(&mut u, "two", "emphasis", &[("level", "strong")]).unwrap();
        assert_eq!(
            u.text,
            r#"<prosody rate="slow">one <emphasis level="strong">two</emphasis> three</prosody>"#
        );
    }

    #[test]
    fn exact_selection_of_a_span_wraps_it_whole() {
        let mut u = Utterance::new("Bob", r#"say <emphasis level="strong">this</emphasis> now"#);
        apply(&mut u, "this", "prosody", &[("volume", "loud")]).unwrap();
        assert_eq!(
            u.text,
            r#"say <prosody volume="loud"><emphasis level="strong">this</emphasis></prosody> now"#
        );
    }

    #[test]
    fn selection_crossing_a_span_is_rejected() {
        let original = r#"Hello <emphasis level="strong">big</emphasis> world"#;
        let mut u = Utterance::new("Alice", original);
        let err = apply(&mut u, "llo bi", "prosody", &[("rate", "slow")]).unwrap_err();
        assert!(matches!(err, EditError::InvalidSelection(_)));
        assert_eq!(u.text, original);
    }

    #[test]
    fn selection_covering_a_whole_span_is_allowed() {
        let mut u = Utterance::new("Alice", r#"Hello <emphasis level="strong">big</emphasis> world"#);
        apply(&mut u, "big wor", "prosody", &[("rate", "slow")]).unwrap();
        assert_eq!(
            u.text,
            r#"Hello <prosody rate="slow"><emphasis level="strong">big</emphasis> wor</prosody>ld"#
        );
    }

    #[test]
    fn break_round_trips_through_span_detection() {
        let mut u = Utterance::new("Alice", "Wait here");
        let selection = select(&u, "Wait").unwrap();
        let outcome = annotator()
            .apply_tag(&mut u, selection, "break", &attrs(&[("time", "500ms")]))
            .unwrap();
        assert_eq!(outcome, TagOutcome::Added);
        assert_eq!(u.text, r#"Wait<break time="500ms"/> here"#);

        let found = annotator().find_span(&u, "break", selection).unwrap();
        assert_eq!(found, attrs(&[("time", "500ms")]));
    }

    #[test]
    fn break_at_the_same_spot_is_updated() {
        let mut u = Utterance::new("Alice", r#"Wait<break time="500ms"/> here"#);
        let outcome = annotator()
            .apply_tag(&mut u, Selection::new(4, 4), "break", &attrs(&[("strength", "strong")]))
            .unwrap();
        assert_eq!(outcome, TagOutcome::Updated);
        assert_eq!(u.text, r#"Wait<break time="500ms" strength="strong"/> here"#);
    }

    #[test]
    fn break_inside_a_span_lands_in_the_span() {
        let mut u = Utterance::new("Alice", r#"<prosody rate="slow">one two</prosody>"#);
        annotator()
            .apply_tag(&mut u, Selection::new(0, 3), "break", &attrs(&[("time", "1s")]))
            .unwrap();
        assert_eq!(u.text, r#"<prosody rate="slow">one<break time="1s"/> two</prosody>"#);
    }

    #[test]
    fn break_at_the_end_goes_before_a_stray_closer() {
        let mut u = Utterance::new("Alice", "Hi</speak>");
        annotator()
            .apply_tag(&mut u, Selection::new(2, 2), "break", &attrs(&[("time", "1s")]))
            .unwrap();
        assert_eq!(u.text, r#"Hi<break time="1s"/></speak>"#);
    }

    #[test]
    fn rejects_bad_selections() {
        let mut u = Utterance::new("Alice", "héllo");
        let a = annotator();
        let slow = attrs(&[("rate", "slow")]);
        for selection in [Selection::new(2, 2), Selection::new(3, 1), Selection::new(0, 42), Selection::new(0, 2)] {
            let err = a.apply_tag(&mut u, selection, "prosody", &slow).unwrap_err();
            assert!(matches!(err, EditError::InvalidSelection(_)), "{:?}", selection);
        }
        assert_eq!(u.text, "héllo");
    }

    #[test]
    fn rejects_unknown_tags_and_bad_values() {
        let mut u = Utterance::new("Alice", "Hello");
        let all = Selection::new(0, 5);
        let a = annotator();
        assert_eq!(
            a.apply_tag(&mut u, all, "audio", &Attributes::new()),
            Err(EditError::UnknownTag("audio".into()))
        );
        assert!(matches!(
            a.apply_tag(&mut u, all, "emphasis", &attrs(&[("level", "shouty")])),
            Err(EditError::InvalidAttribute { .. })
        ));
        assert_eq!(u.text, "Hello");
    }

    const EDITS: &[(usize, usize, &str, &[(&str, &str)])] = &[
        (4, 19, "prosody", &[("rate", "fast")]),
        (10, 15, "emphasis", &[("level", "strong")]),
        (0, 43, "prosody", &[("pitch", "low")]),
        (2, 12, "sub", &[("alias", "nope")]),
        (16, 25, "say-as", &[("interpret-as", "characters")]),
        (10, 19, "phoneme", &[("alphabet", "ipa"), ("ph", "braʊn fɒks")]),
        (35, 39, "emphasis", &[("level", "reduced")]),
    ];

    /// Runs every edit, checking that each added span covers exactly its
    /// selection, then checks that no two spans overlap.
    fn run_edits(text: &str) -> Vec<Segment> {
        let mut u = Utterance::new("Alice", text);
        let a = annotator();
        for (start, end, tag, pairs) in EDITS {
            let selection = Selection::new(*start, *end);
            if let Ok(TagOutcome::Added) = a.apply_tag(&mut u, selection, tag, &attrs(pairs)) {
                let found = spans(&parse_markup(&u.text));
                assert!(
                    found.iter().any(|s| s.name == *tag && s.start == *start && s.end == *end),
                    "<{}> {}..{} missing from {}",
                    tag,
                    start,
                    end,
                    u.text
                );
            }
        }

        let segments = parse_markup(&u.text);
        assert_eq!(render(&segments), u.text);
        assert_eq!(plain_text(&segments), "the quick brown fox jumps over the lazy dog");

        let found = spans(&segments);
        for x in &found {
            for y in &found {
                let disjoint = x.end <= y.start || y.end <= x.start;
                let nested = (x.start <= y.start && y.end <= x.end) || (y.start <= x.start && x.end <= y.end);
                assert!(disjoint || nested, "{:?} overlaps {:?}", x, y);
            }
        }
        segments
    }

    fn raw_count(segments: &[Segment]) -> usize {
        segments
            .iter()
            .map(|s| match s {
                Segment::Raw(_) => 1,
                Segment::Tag(node) => raw_count(&node.children),
                Segment::Text(_) => 0,
            })
            .sum()
    }

    #[test]
    fn successive_edits_never_overlap() {
        let segments = run_edits("the quick brown fox jumps over the lazy dog");
        assert_eq!(raw_count(&segments), 0);
        assert!(spans(&segments).len() >= 5);
    }

    #[test]
    fn successive_edits_never_overlap_around_stray_markup() {
        let segments = run_edits("the quick </prosody>brown fox <emphasis>jumps over the lazy dog");
        assert_eq!(raw_count(&segments), 2);
        let names: Vec<_> = spans(&segments).into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["emphasis", "say-as", "emphasis"]);
    }

    #[test]
    fn unpaired_opener_of_the_same_tag_blocks_wrapping() {
        let mut u = Utterance::new("Alice", "ab <prosody>cd ef");
        let result = annotator().apply_tag(
            &mut u,
            Selection::new(1, 5),
            "prosody",
            &attrs(&[("rate", "slow")]),
        );
        assert!(matches!(result, Err(EditError::InvalidSelection(_))));
        assert_eq!(u.text, "ab <prosody>cd ef");
    }

    #[test]
    fn unpaired_closer_of_the_same_tag_blocks_wrapping() {
        let mut u = Utterance::new("Alice", "abc</prosody> def");
        let result = annotator().apply_tag(
            &mut u,
            Selection::new(2, 7),
            "prosody",
            &attrs(&[("rate", "slow")]),
        );
        assert!(matches!(result, Err(EditError::InvalidSelection(_))));
        assert_eq!(u.text, "abc</prosody> def");
    }

    #[test]
    fn unpaired_markup_of_another_tag_is_wrapped() {
        let mut u = Utterance::new("Alice", "ab <emphasis>cd ef");
        let a = annotator();
        let outcome = a
            .apply_tag(&mut u, Selection::new(1, 5), "prosody", &attrs(&[("rate", "slow")]))
            .unwrap();
        assert_eq!(outcome, TagOutcome::Added);
        assert_eq!(u.text, r#"a<prosody rate="slow">b <emphasis>cd</prosody> ef"#);
        assert_eq!(
            a.find_span(&u, "prosody", Selection::new(1, 5)),
            Some(attrs(&[("rate", "slow")]))
        );
    }

    #[test]
    fn tag_names_match_exactly_on_removal() {
        let mut u = Utterance::new("Alice", "<Emphasis>loud</Emphasis> and <emphasis>clear</emphasis>");
        assert_eq!(annotator().remove_tags(&mut u, &["emphasis"]), 1);
        assert_eq!(u.text, "<Emphasis>loud</Emphasis> and clear");
    }

    #[test]
    fn ampersand_in_alias_is_escaped() {
        let mut u = Utterance::new("Alice", "call ATT now");
        let a = annotator();
        apply(&mut u, "ATT", "sub", &[("alias", "AT&T")]).unwrap();
        assert_eq!(u.text, r#"call <sub alias="AT&amp;T">ATT</sub> now"#);
        assert_eq!(
            a.find_span(&u, "sub", Selection::new(5, 8)),
            Some(attrs(&[("alias", "AT&T")]))
        );
    }


    #[test]
    fn remove_tag_unwraps_every_span() {
        let mut u = Utterance::new(
            "Alice",
            r#"<emphasis level="strong">a</emphasis> b <prosody rate="slow"><emphasis>c</emphasis></prosody>"#,
        );
        let removed = annotator().remove_tag(&mut u, "emphasis").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(u.text, r#"a b <prosody rate="slow">c</prosody>"#);
    }

    #[test]
    fn remove_absent_tag_is_not_found_and_unchanged() {
        let mut u = Utterance::new("Alice", r#"Hello <emphasis>there</emphasis></speak>"#);
        let before = u.clone();
        assert_eq!(
            annotator().remove_tag(&mut u, "prosody"),
            Err(EditError::NotFound("prosody".into()))
        );
        assert_eq!(u, before);
    }

    #[test]
    fn remove_break_is_idempotent() {
        let mut once = Utterance::new("Alice", r#"Wait<break time="1s"/> for it<break strength="weak"/>"#);
        annotator().remove_tag(&mut once, "break").unwrap();
        let mut twice = once.clone();
        let _ = annotator().remove_tag(&mut twice, "break");
        assert_eq!(once.text, "Wait for it");
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn remove_tags_handles_several_kinds() {
        let mut u = Utterance::new(
            "Alice",
            r#"<prosody rate="slow">one <emphasis>two</emphasis></prosody><break time="1s"/> <sub alias="x">three</sub>"#,
        );
        let removed = annotator().remove_tags(&mut u, &["prosody", "break", "emphasis"]);
        assert_eq!(removed, 3);
        assert_eq!(u.text, r#"one two <sub alias="x">three</sub>"#);
        assert_eq!(annotator().remove_tags(&mut u, &["prosody"]), 0);
    }

    #[test]
    fn toggles_pause() {
        let mut u = Utterance::new("Alice", "Hi");
        toggle_pause(&mut u);
        assert!(!u.add_pause);
        toggle_pause(&mut u);
        assert!(u.add_pause);
    }

    #[test]
    fn renames_speaker() {
        let mut u = Utterance::new("Alice", "Hi");
        rename_speaker(&mut u, "  Carol ").unwrap();
        assert_eq!(u.speaker, "Carol");
        assert_eq!(rename_speaker(&mut u, "   "), Err(EditError::InvalidName));
        assert_eq!(u.speaker, "Carol");
    }

    #[test]
    fn select_finds_visible_text_only() {
        let u = Utterance::new("Alice", r#"<prosody rate="slow">Hello</prosody> there"#);
        assert_eq!(select(&u, "Hello there"), Some(Selection::new(0, 11)));
        assert_eq!(select(&u, "rate"), None);
        assert_eq!(select(&u, ""), None);
    }
}
