//! Parse tracing.
//!
//! With [`Trace::On`](crate::Trace), every parser logs its entry and exit
//! under the `weft::trace` target at `debug` level, indented by nesting
//! depth:
//!
//! ```text
//! [begin uint_ >> +char_('a', 'z'); input="123abc"]
//!   [begin uint_; input="123abc"]
//!     matched "123"
//!     attribute: 123
//!   [end uint_; input="abc"]
//!   ...
//! ```

use weft_text::Cursor;

use crate::context::{ParseState, Scope};
use crate::parser::{PResult, Parser};

/// Characters of remaining input shown in trace lines.
pub(crate) const TRACE_PREVIEW_CHARS: usize = 8;

/// Indentation per nesting level.
const INDENT: usize = 2;

fn preview(rest: &str) -> String {
    rest.chars()
        .take(TRACE_PREVIEW_CHARS)
        .flat_map(char::escape_debug)
        .collect()
}

pub(crate) fn traced<'p, 'i>(
    parser: &'p Parser,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let outer = st.trace_depth * INDENT;
    let inner = outer + INDENT;
    tracing::debug!(
        target: "weft::trace",
        "{:outer$}[begin {parser}; input=\"{}\"]",
        "",
        preview(cur.rest())
    );

    let start = cur.position();
    st.trace_depth += 1;
    let result = parser.eval_node(st, scope, cur);
    st.trace_depth -= 1;

    match &result {
        Ok(Some(attr)) => {
            let matched: String = cur.slice_from(start).escape_debug().collect();
            tracing::debug!(target: "weft::trace", "{:inner$}matched \"{matched}\"", "");
            if !attr.is_none() {
                tracing::debug!(target: "weft::trace", "{:inner$}attribute: {attr}", "");
            }
        }
        Ok(None) => tracing::debug!(target: "weft::trace", "{:inner$}no match", ""),
        Err(err) => tracing::debug!(target: "weft::trace", "{:inner$}{err}", ""),
    }
    tracing::debug!(
        target: "weft::trace",
        "{:outer$}[end {parser}; input=\"{}\"]",
        "",
        preview(cur.rest())
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_and_escapes() {
        assert_eq!(preview("abcdefghijk"), "abcdefgh");
        assert_eq!(preview("a\nb"), "a\\nb");
        assert_eq!(preview(""), "");
    }
}
