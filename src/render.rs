//! Display formatting for captions returned by the model.
//!
//! List-style tones tend to come back as a handful of options separated by
//! markdown bold markers (`**Option 1:** ...`). Those are split into
//! paragraphs; anything else is shown as a single quoted line.

use std::fmt;

use crate::tone::Tone;

pub const BOLD_MARKER: &str = "**";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// A fragment mentioning "option", e.g. `Option 2:`.
    Heading(String),
    Body(String),
}

impl Fragment {
    pub fn text(&self) -> &str {
        match self {
            Fragment::Heading(text) | Fragment::Body(text) => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedCaption {
    Options { tone: Tone, fragments: Vec<Fragment> },
    Quoted(String),
}

pub fn render_caption(caption: &str, tone: Tone) -> RenderedCaption {
    if !tone.is_list_style() {
        return RenderedCaption::Quoted(format!("“{caption}”"));
    }

    let fragments = caption
        .split(BOLD_MARKER)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if chunk.to_lowercase().contains("option") {
                Fragment::Heading(chunk.to_string())
            } else {
                Fragment::Body(chunk.to_string())
            }
        })
        .collect();

    RenderedCaption::Options { tone, fragments }
}

/// ANSI colour for option headings, matching the page's pink/red titles.
fn heading_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Funny => "95",
        Tone::Savage => "91",
        _ => "39",
    }
}

impl RenderedCaption {
    /// A view that adds terminal colours to headings when `color` is set.
    pub fn styled(&self, color: bool) -> Styled<'_> {
        Styled {
            caption: self,
            color,
        }
    }
}

pub struct Styled<'a> {
    caption: &'a RenderedCaption,
    color: bool,
}

impl fmt::Display for Styled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.caption {
            RenderedCaption::Quoted(line) => write!(f, "{line}"),
            RenderedCaption::Options { tone, fragments } => {
                for (i, fragment) in fragments.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    match fragment {
                        Fragment::Heading(text) if self.color => {
                            write!(f, "\x1b[1;{}m{text}\x1b[0m", heading_color(*tone))?
                        }
                        _ => write!(f, "{}", fragment.text())?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Plain text, one paragraph per line.
impl fmt::Display for RenderedCaption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.styled(false), f)
    }
}
