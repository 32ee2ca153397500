//! Map file syntax: one directive per line
//!
//! ```text
//! # comment
//! Bitmap <path>
//! Shape <w> <h> [offx offy]
//! Pattern <w> <h> <cell>*(w*h) <nbBitmaps> <bitmap>*nbBitmaps [tiled|stretched]
//! Entity <player|solid|decoration> <px> <py> [dpx dpy] [ddpx ddpy]
//! Sh2En <entity> <shape>
//! Pa2En <entity> <pattern>
//! ```
//!
//! Indices in the file are 1-based and count entries of the same registry in
//! file order.

use glam::Vec2;
use skyhop_core::{Result, SkyhopError};
use skyhop_sim::{EntityKind, PatternKind};
use std::str::FromStr;

/// One parsed map line
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Bitmap {
        path: String,
    },
    Shape {
        size: Vec2,
        offset: Vec2,
    },
    Pattern {
        columns: u32,
        rows: u32,
        cells: Vec<u32>,
        /// 1-based bitmap indices
        bitmaps: Vec<usize>,
        kind: PatternKind,
    },
    Entity {
        kind: EntityKind,
        position: Vec2,
        velocity: Option<Vec2>,
        acceleration: Option<Vec2>,
    },
    ShapeToEntity {
        entity: usize,
        shape: usize,
    },
    PatternToEntity {
        entity: usize,
        pattern: usize,
    },
}

/// Parse one line; blank lines and comments yield `None`
pub fn parse_line(line: usize, text: &str) -> Result<Option<Directive>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = Tokens::new(line, text);
    let keyword = tokens.word("directive")?;
    let directive = match keyword {
        "Bitmap" => Directive::Bitmap {
            path: tokens.word("bitmap path")?.to_string(),
        },
        "Shape" => {
            let size = tokens.vec2("shape size")?;
            let offset = tokens.optional_vec2("shape offset")?.unwrap_or(Vec2::ZERO);
            Directive::Shape { size, offset }
        }
        "Pattern" => parse_pattern(&mut tokens)?,
        "Entity" => {
            let kind_name = tokens.word("entity type")?;
            let kind = EntityKind::from_str(kind_name)
                .map_err(|message| SkyhopError::malformed(line, message))?;
            Directive::Entity {
                kind,
                position: tokens.vec2("entity position")?,
                velocity: tokens.optional_vec2("entity velocity")?,
                acceleration: tokens.optional_vec2("entity acceleration")?,
            }
        }
        "Sh2En" => Directive::ShapeToEntity {
            entity: tokens.parse("entity index")?,
            shape: tokens.parse("shape index")?,
        },
        "Pa2En" => Directive::PatternToEntity {
            entity: tokens.parse("entity index")?,
            pattern: tokens.parse("pattern index")?,
        },
        other => {
            return Err(SkyhopError::malformed(
                line,
                format!("unknown directive '{other}'"),
            ))
        }
    };

    tokens.finish()?;
    Ok(Some(directive))
}

fn parse_pattern(tokens: &mut Tokens<'_>) -> Result<Directive> {
    let columns: u32 = tokens.parse("pattern width")?;
    let rows: u32 = tokens.parse("pattern height")?;
    let cell_count = columns
        .checked_mul(rows)
        .ok_or_else(|| SkyhopError::malformed(tokens.line, "pattern is too large"))?;
    let cells = (0..cell_count)
        .map(|_| tokens.parse("pattern cell"))
        .collect::<Result<Vec<u32>>>()?;
    let bitmap_count: usize = tokens.parse("pattern bitmap count")?;
    let bitmaps = (0..bitmap_count)
        .map(|_| tokens.parse("pattern bitmap index"))
        .collect::<Result<Vec<usize>>>()?;
    let kind = match tokens.next() {
        None => PatternKind::default(),
        Some(word) if word.eq_ignore_ascii_case("tiled") => PatternKind::Tiled,
        Some(word) if word.eq_ignore_ascii_case("stretched") => PatternKind::Stretched,
        Some(word) => {
            return Err(SkyhopError::malformed(
                tokens.line,
                format!("unknown pattern kind '{word}'"),
            ))
        }
    };
    Ok(Directive::Pattern {
        columns,
        rows,
        cells,
        bitmaps,
        kind,
    })
}

/// Whitespace tokenizer that reports errors against its line
struct Tokens<'a> {
    line: usize,
    inner: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            inner: text.split_whitespace().peekable(),
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        self.next()
            .ok_or_else(|| SkyhopError::malformed(self.line, format!("missing {what}")))
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let word = self.word(what)?;
        word.parse().map_err(|_| {
            SkyhopError::malformed(self.line, format!("invalid {what} '{word}'"))
        })
    }

    fn vec2(&mut self, what: &str) -> Result<Vec2> {
        Ok(Vec2::new(self.parse(what)?, self.parse(what)?))
    }

    /// A pair of numbers if any token is left
    fn optional_vec2(&mut self, what: &str) -> Result<Option<Vec2>> {
        if self.inner.peek().is_none() {
            return Ok(None);
        }
        self.vec2(what).map(Some)
    }

    fn finish(mut self) -> Result<()> {
        match self.next() {
            None => Ok(()),
            Some(extra) => Err(SkyhopError::malformed(
                self.line,
                format!("unexpected trailing token '{extra}'"),
            )),
        }
    }
}
