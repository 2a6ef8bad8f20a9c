use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered attribute list. Later writes of the same name replace the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Attributes, M::Error> {
                let mut attributes = Attributes::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    attributes.set(name, value);
                }
                Ok(attributes)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    /// Markup that does not pair up (a stray `</speak>`, an unclosed opener).
    /// Kept verbatim, never visible.
    Raw(String),
    Tag(TagNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagNode {
    pub name: String,
    attributes: Attributes,
    pub children: Vec<Segment>,
    pub empty: bool,
    /// Opening tag exactly as it was read; dropped once the attributes change.
    source: Option<String>,
}

impl TagNode {
    pub fn new(name: impl Into<String>, attributes: Attributes, empty: bool) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
            empty,
            source: None,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn merge_attributes(&mut self, update: &Attributes) {
        self.attributes.merge(update);
        self.source = None;
    }

    pub fn open_tag(&self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }
        let mut tag = format!("<{}", self.name);
        for (name, value) in self.attributes.iter() {
            tag.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        tag.push_str(if self.empty { "/>" } else { ">" });
        tag
    }

    pub fn close_tag(&self) -> String {
        if self.empty {
            String::new()
        } else {
            format!("</{}>", self.name)
        }
    }
}

impl Segment {
    /// Byte length of the visible text under this segment.
    pub fn visible_len(&self) -> usize {
        match self {
            Segment::Text(text) => text.len(),
            Segment::Raw(_) => 0,
            Segment::Tag(node) => node.children.iter().map(Segment::visible_len).sum(),
        }
    }
}

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(
        r#"(?x)
        <(/)?                                  # optional closing slash
        ([A-Za-z][A-Za-z0-9:_-]*)              # tag name
        ((?:\s+[A-Za-z_:][A-Za-z0-9:_.-]*\s*=\s*(?:"[^"]*"|'[^']*'))*)  # attributes
        \s*(/)?>                               # optional self-closing slash
        "#
    )
    .unwrap();
    static ref ATTRIBUTE_REGEX: Regex =
        Regex::new(r#"([A-Za-z_:][A-Za-z0-9:_.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

struct Frame {
    open: Option<(TagNode, String)>,
    children: Vec<Segment>,
}

impl Frame {
    fn root() -> Self {
        Self {
            open: None,
            children: Vec::new(),
        }
    }

    /// An opener that never got closed: its source goes back in as raw markup.
    fn unwind(self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.children.len() + 1);
        if let Some((_, source)) = self.open {
            segments.push(Segment::Raw(source));
        }
        segments.extend(self.children);
        segments
    }
}

/// Read marked-up text into a segment tree. Never fails: anything that does
/// not nest properly is kept as [`Segment::Raw`], so rendering the result
/// gives back the input byte for byte.
pub fn parse_markup(input: &str) -> Vec<Segment> {
    let mut stack = vec![Frame::root()];
    let mut last_end = 0;

    for cap in TAG_REGEX.captures_iter(input) {
        let m = cap.get(0).unwrap();

        if m.start() > last_end {
            top(&mut stack).push(Segment::Text(input[last_end..m.start()].to_string()));
        }
        last_end = m.end();

        let source = m.as_str().to_string();
        let name = &cap[2];
        let closing = cap.get(1).is_some();
        let self_closing = cap.get(4).is_some();
        let has_attributes = !cap[3].trim().is_empty();

        if closing {
            if self_closing || has_attributes {
                top(&mut stack).push(Segment::Raw(source));
                continue;
            }
            close(&mut stack, name, source);
            continue;
        }

        let mut node = TagNode::new(name, parse_attributes(&cap), self_closing);
        node.source = Some(source.clone());
        if self_closing {
            top(&mut stack).push(Segment::Tag(node));
        } else {
            stack.push(Frame {
                open: Some((node, source)),
                children: Vec::new(),
            });
        }
    }

    if last_end < input.len() {
        top(&mut stack).push(Segment::Text(input[last_end..].to_string()));
    }

    while stack.len() > 1 {
        let frame = stack.pop().unwrap();
        top(&mut stack).extend(frame.unwind());
    }

    stack.pop().map(|f| f.children).unwrap_or_default()
}

fn top(stack: &mut [Frame]) -> &mut Vec<Segment> {
    &mut stack.last_mut().unwrap().children
}

fn close(stack: &mut Vec<Frame>, name: &str, source: String) {
    let matching = stack
        .iter()
        .rposition(|f| matches!(&f.open, Some((node, _)) if node.name == name));

    let Some(index) = matching else {
        top(stack).push(Segment::Raw(source));
        return;
    };

    while stack.len() > index + 1 {
        let frame = stack.pop().unwrap();
        top(stack).extend(frame.unwind());
    }

    let frame = stack.pop().unwrap();
    if let Some((mut node, _)) = frame.open {
        node.children = frame.children;
        top(stack).push(Segment::Tag(node));
    }
}

fn parse_attributes(cap: &Captures) -> Attributes {
    ATTRIBUTE_REGEX
        .captures_iter(&cap[3])
        .map(|a| {
            let value = a.get(2).or_else(|| a.get(3)).map_or("", |v| v.as_str());
            (a[1].to_string(), unescape(value))
        })
        .collect()
}

/// Attribute text as it goes between double quotes.
fn escape(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Name of the tag written in a [`Segment::Raw`] source, if it is one.
pub fn raw_tag_name(source: &str) -> Option<&str> {
    TAG_REGEX
        .captures(source)
        .and_then(|cap| cap.get(2))
        .map(|name| name.as_str())
}

pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    render_into(&mut out, segments);
    out
}

fn render_into(out: &mut String, segments: &[Segment]) {
    for segment in segments {
        match segment {
            Segment::Text(text) | Segment::Raw(text) => out.push_str(text),
            Segment::Tag(node) => {
                out.push_str(&node.open_tag());
                render_into(out, &node.children);
                out.push_str(&node.close_tag());
            }
        }
    }
}

/// The text a listener hears: markup removed, content kept.
pub fn plain_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    collect_plain(&mut out, segments);
    out
}

fn collect_plain(out: &mut String, segments: &[Segment]) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Raw(_) => {}
            Segment::Tag(node) => collect_plain(out, &node.children),
        }
    }
}

/// A tag's extent over the visible text, used to check nesting.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
}

#[cfg(test)]
pub fn spans(segments: &[Segment]) -> Vec<Span> {
    let mut out = Vec::new();
    collect_spans(&mut out, segments, 0, 0);
    out
}

#[cfg(test)]
fn collect_spans(out: &mut Vec<Span>, segments: &[Segment], mut offset: usize, depth: usize) {
    for segment in segments {
        let len = segment.visible_len();
        if let Segment::Tag(node) = segment {
            out.push(Span {
                name: node.name.clone(),
                start: offset,
                end: offset + len,
                depth,
            });
            collect_spans(out, &node.children, offset, depth + 1);
        }
        offset += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(input: &str) {
        assert_eq!(render(&parse_markup(input)), input);
    }

    #[test]
    fn parses_plain_text() {
        let segments = parse_markup("Hello world");
        assert_eq!(segments, vec![Segment::Text("Hello world".into())]);
    }

    #[test]
    fn parses_empty_input() {
        assert!(parse_markup("").is_empty());
    }

    #[test]
    fn parses_nested_tags() {
        let segments = parse_markup(r#"Hi <prosody rate="slow">there <emphasis level="strong">you</emphasis></prosody>!"#);
        assert_eq!(segments.len(), 3);
        let Segment::Tag(prosody) = &segments[1] else {
            panic!("expected prosody node");
        };
        assert_eq!(prosody.name, "prosody");
        assert_eq!(prosody.attributes().get("rate"), Some("slow"));
        assert!(matches!(&prosody.children[1], Segment::Tag(n) if n.name == "emphasis"));
        assert_eq!(plain_text(&segments), "Hi there you!");
    }

    #[test]
    fn parses_self_closing_break() {
        let segments = parse_markup(r#"Wait<break time="500ms"/>here"#);
        assert!(matches!(&segments[1], Segment::Tag(n) if n.empty && n.attributes().get("time") == Some("500ms")));
        assert_eq!(plain_text(&segments), "Waithere");
    }

    #[test]
    fn stray_closer_is_raw() {
        let segments = parse_markup("Hello there</speak>");
        assert_eq!(segments[1], Segment::Raw("</speak>".into()));
        assert_eq!(plain_text(&segments), "Hello there");
    }

    #[test]
    fn unclosed_opener_is_raw() {
        let segments = parse_markup(r#"<emphasis level="strong">loud"#);
        assert_eq!(segments[0], Segment::Raw(r#"<emphasis level="strong">"#.into()));
        assert_eq!(plain_text(&segments), "loud");
    }

    #[test]
    fn crossing_tags_keep_only_proper_nesting() {
        let segments = parse_markup("<a>one <b>two</a> three</b>");
        let Segment::Tag(a) = &segments[0] else {
            panic!("expected <a>");
        };
        assert_eq!(a.children[1], Segment::Raw("<b>".into()));
        assert_eq!(segments.last(), Some(&Segment::Raw("</b>".into())));
    }

    #[test]
    fn render_reproduces_input_exactly() {
        roundtrip("");
        roundtrip("no markup at all");
        roundtrip(r#"<prosody  rate='slow' >odd spacing</prosody>"#);
        roundtrip(r#"Hello there<break time="1s"/></speak>"#);
        roundtrip("<a>one <b>two</a> three</b>");
        roundtrip("1 < 2 and 3 > 2");
        roundtrip(r#"<lang xml:lang="fr-FR">bonjour</lang> à tous"#);
    }

    #[test]
    fn edited_attributes_render_canonically() {
        let mut segments = parse_markup(r#"<prosody  rate='slow'>x</prosody>"#);
        let Segment::Tag(node) = &mut segments[0] else {
            panic!("expected prosody node");
        };
        node.merge_attributes(&[("pitch", "high")].into_iter().collect());
        assert_eq!(
            render(&segments),
            r#"<prosody rate="slow" pitch="high">x</prosody>"#
        );
    }

    #[test]
    fn rewritten_values_are_escaped_for_double_quotes() {
        let mut segments = parse_markup(r#"<phoneme ph='a"b'>word</phoneme>"#);
        let Segment::Tag(node) = &mut segments[0] else {
            panic!("expected phoneme node");
        };
        assert_eq!(node.attributes().get("ph"), Some(r#"a"b"#));
        node.merge_attributes(&[("alphabet", "ipa")].into_iter().collect());

        let rendered = render(&segments);
        assert_eq!(
            rendered,
            r#"<phoneme ph="a&quot;b" alphabet="ipa">word</phoneme>"#
        );

        let reparsed = parse_markup(&rendered);
        assert_eq!(reparsed.len(), 1);
        let Segment::Tag(node) = &reparsed[0] else {
            panic!("expected phoneme node");
        };
        assert_eq!(node.attributes().get("ph"), Some(r#"a"b"#));
    }

    #[test]
    fn ampersands_are_escaped_and_read_back() {
        let mut node = TagNode::new("sub", [("alias", "AT&T")].into_iter().collect(), false);
        node.children.push(Segment::Text("ATT".into()));
        let rendered = render(&[Segment::Tag(node)]);
        assert_eq!(rendered, r#"<sub alias="AT&amp;T">ATT</sub>"#);

        let Segment::Tag(node) = &parse_markup(&rendered)[0] else {
            panic!("expected sub node");
        };
        assert_eq!(node.attributes().get("alias"), Some("AT&T"));
    }

    #[test]
    fn raw_markup_names_its_tag() {
        assert_eq!(raw_tag_name("</prosody>"), Some("prosody"));
        assert_eq!(raw_tag_name(r#"<emphasis level="strong">"#), Some("emphasis"));
        assert_eq!(raw_tag_name("plain"), None);
    }

    #[test]
    fn spans_report_visible_ranges() {
        let segments = parse_markup(r#"ab<emphasis>cd<break/>ef</emphasis>g"#);
        let found = spans(&segments);
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].start, found[0].end), (2, 6));
        assert_eq!((found[1].start, found[1].end, found[1].depth), (4, 4, 1));
    }

    #[test]
    fn attributes_keep_insertion_order_through_json() {
        let attributes: Attributes =
            serde_json::from_str(r#"{"rate":"slow","pitch":"low","volume":"loud"}"#).unwrap();
        let names: Vec<_> = attributes.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rate", "pitch", "volume"]);
        assert_eq!(
            serde_json::to_string(&attributes).unwrap(),
            r#"{"rate":"slow","pitch":"low","volume":"loud"}"#
        );
    }
}
