//! URL fragment grammar: `toolchain/<id>` or `toolchain/<id>/<query>`.

use std::collections::BTreeSet;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use shared::domain::ToolchainId;
use url::form_urlencoded;

const TOOLCHAIN_PREFIX: &str = "toolchain/";
const WIDGETS_KEY: &str = "widgets";

/// Characters that would break a single path segment of the fragment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The URL-addressable part of the application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    pub toolchain_id: Option<ToolchainId>,
    pub widgets: BTreeSet<String>,
}

impl RouteState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, S>(toolchain_id: Option<ToolchainId>, widgets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            toolchain_id,
            widgets: widgets.into_iter().map(Into::into).collect(),
        }
    }

    /// Fragment for this state. The empty route encodes as `""`.
    pub fn to_fragment(&self) -> String {
        match &self.toolchain_id {
            Some(id) => construct_fragment(id, &self.widgets),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFragment {
    Empty,
    Route(RouteState),
    NotFound,
}

/// Strips one leading `#`, any leading `/` and trailing whitespace.
pub fn normalize_fragment(raw: &str) -> &str {
    let trimmed = raw.strip_prefix('#').unwrap_or(raw);
    trimmed.trim_start_matches('/').trim_end()
}

pub fn parse_fragment(raw: &str) -> ParsedFragment {
    let fragment = normalize_fragment(raw);
    if fragment.is_empty() {
        return ParsedFragment::Empty;
    }

    let Some(rest) = fragment.strip_prefix(TOOLCHAIN_PREFIX) else {
        return ParsedFragment::NotFound;
    };
    // A trailing `?search` never carries route state.
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);

    let mut segments = path.split('/');
    let id_segment = segments.next().unwrap_or_default();
    let query_segment = segments.next();
    if segments.next().is_some() || query_segment.is_some_and(str::is_empty) {
        return ParsedFragment::NotFound;
    }

    let Ok(toolchain_id) = ToolchainId::new(percent_decode_str(id_segment).decode_utf8_lossy())
    else {
        return ParsedFragment::NotFound;
    };
    let widgets = query_segment.map(parse_widgets).unwrap_or_default();

    ParsedFragment::Route(RouteState {
        toolchain_id: Some(toolchain_id),
        widgets,
    })
}

/// Collects every `widgets` (or bracketed `widgets[]`) value; other keys are ignored.
pub fn parse_widgets(query: &str) -> BTreeSet<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| is_widgets_key(key))
        .map(|(_, value)| value.into_owned())
        .collect()
}

fn is_widgets_key(key: &str) -> bool {
    match key.strip_prefix(WIDGETS_KEY) {
        Some("") => true,
        Some(suffix) => suffix.starts_with('[') && suffix.ends_with(']'),
        None => false,
    }
}

pub fn construct_fragment(toolchain_id: &ToolchainId, widgets: &BTreeSet<String>) -> String {
    let mut fragment = format!(
        "{TOOLCHAIN_PREFIX}{}",
        utf8_percent_encode(toolchain_id.as_str(), SEGMENT)
    );
    if !widgets.is_empty() {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for widget in widgets {
            query.append_pair(WIDGETS_KEY, widget);
        }
        fragment.push('/');
        fragment.push_str(&query.finish());
    }
    fragment
}

#[cfg(test)]
#[path = "tests/route_tests.rs"]
mod tests;
