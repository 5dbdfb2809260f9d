//! Markup fragment parser → `Document`.
//!
//! Built on `winnow` 0.7. Handles the subset of HTML that snapshot
//! restoration needs: elements, quoted / unquoted / boolean attributes,
//! void elements, self-closing syntax, text, raw-text `script`/`style`
//! bodies, and skipped comments / doctypes. Mismatched close tags are
//! recovered from the way browsers do: by popping to the nearest open
//! element with the same tag, or ignoring the tag when none is open.

use crate::css::skip_space;
use crate::model::{Document, DomNode, ElementData, is_void_element};
use petgraph::graph::NodeIndex;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};

/// One lexical unit of markup.
#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Open {
        tag: &'a str,
        attributes: Vec<(&'a str, String)>,
        self_closing: bool,
    },
    Close(&'a str),
    Skip,
}

/// Parse a markup fragment into a fresh document (children of its root).
#[must_use = "parsing result should be used"]
pub fn parse_fragment(input: &str) -> Result<Document, String> {
    let mut doc = Document::new();
    let root = doc.root;
    parse_fragment_into(&mut doc, root, input)?;
    Ok(doc)
}

/// Parse `input` and append the resulting nodes under `parent`.
pub fn parse_fragment_into(doc: &mut Document, parent: NodeIndex, input: &str) -> Result<(), String> {
    let mut rest = input;
    // (node, tag) of every open element; the bottom entry is `parent`.
    let mut stack: Vec<(NodeIndex, String)> = vec![(parent, String::new())];

    while !rest.is_empty() {
        let token = token
            .parse_next(&mut rest)
            .map_err(|e| format!("Markup parse error near `{}`: {e}", preview(rest)))?;
        let current = stack.last().map(|(idx, _)| *idx).unwrap_or(parent);

        match token {
            Token::Text(text) => {
                doc.append(current, DomNode::Text(decode_entities(text)));
            }
            Token::Open {
                tag,
                attributes,
                self_closing,
            } => {
                let mut el = ElementData::new(tag);
                for (name, value) in attributes {
                    el.set_attribute(&name.to_ascii_lowercase(), &value);
                }
                let tag = el.tag.clone();
                let idx = doc.append(current, DomNode::Element(el));
                if self_closing || is_void_element(&tag) {
                    continue;
                }
                if tag == "script" || tag == "style" {
                    let body = raw_text(&mut rest, &tag);
                    if !body.is_empty() {
                        doc.append(idx, DomNode::Text(body.to_string()));
                    }
                    continue;
                }
                stack.push((idx, tag));
            }
            Token::Close(tag) => {
                let tag = tag.to_ascii_lowercase();
                if let Some(pos) = stack.iter().rposition(|(_, t)| *t == tag)
                    && pos > 0
                {
                    stack.truncate(pos);
                } else {
                    log::trace!("ignoring stray </{tag}>");
                }
            }
            Token::Skip => {}
        }
    }

    Ok(())
}

fn preview(s: &str) -> &str {
    let end = s.char_indices().nth(24).map(|(i, _)| i).unwrap_or(s.len());
    &s[..end]
}

/// Consume a raw-text body up to (and including) its closing tag.
fn raw_text<'a>(input: &mut &'a str, tag: &str) -> &'a str {
    let close = format!("</{tag}");
    let lower = input.to_ascii_lowercase();
    match lower.find(&close) {
        Some(pos) => {
            let body = &input[..pos];
            let after = &input[pos..];
            let end = after.find('>').map(|i| i + 1).unwrap_or(after.len());
            *input = &after[end..];
            body
        }
        None => {
            let body = *input;
            *input = "";
            body
        }
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn token<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    alt((
        comment.map(|_| Token::Skip),
        declaration.map(|_| Token::Skip),
        close_tag.map(Token::Close),
        open_tag,
        text.map(Token::Text),
        // A lone `<` that starts no tag is literal text.
        "<".map(Token::Text),
    ))
    .parse_next(input)
}

fn comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<!--", take_until(0.., "-->"), "-->").parse_next(input)
}

fn declaration<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<!", take_till(0.., '>'), ">").parse_next(input)
}

fn text<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., '<').parse_next(input)
}

fn tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-' || c == ':').parse_next(input)
}

fn close_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let name = preceded("</", tag_name).parse_next(input)?;
    let _ = take_till(0.., '>').parse_next(input)?;
    let _ = ">".parse_next(input)?;
    Ok(name)
}

fn open_tag<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    let tag = preceded("<", tag_name).parse_next(input)?;
    let mut attributes = Vec::new();
    loop {
        skip_space(input);
        if let Some(closing) = opt(alt(("/>", ">"))).parse_next(input)? {
            return Ok(Token::Open {
                tag,
                attributes,
                self_closing: closing == "/>",
            });
        }
        if opt("/").parse_next(input)?.is_some() {
            continue;
        }
        attributes.push(attribute.parse_next(input)?);
    }
}

fn attribute_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && c != '=' && c != '>' && c != '/' && c != '"' && c != '\''
    })
    .parse_next(input)
}

fn attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, String)> {
    let name = attribute_name.parse_next(input)?;
    skip_space(input);
    if opt("=").parse_next(input)?.is_none() {
        // Boolean attribute.
        return Ok((name, String::new()));
    }
    skip_space(input);
    let raw = alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_while(0.., |c: char| !c.is_whitespace() && c != '>'),
    ))
    .parse_next(input)?;
    Ok((name, decode_entities(raw)))
}

/// Decode the small set of entities the emitter produces, plus numeric
/// character references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest.find(';').filter(|e| *e <= 10) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" | "#39" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
