//! Encoded (possibly merged) lines -> document.
//!
//! Records are consumed as `t:` / `c:` pairs and the depth is the running
//! sum of the deltas. Conflict delimiters from the merge engine are passed
//! through unindented.
//!
//! Each side of a merge (ours, base, theirs) keeps its own depth. Lines
//! outside conflict blocks are shared by all three sides and advance every
//! depth; a conflict section advances only its own side. Shared lines are
//! rendered at the "ours" depth.
//!
//! When the last records of the variants differ only in their delta
//! lines, every section ends between a delta and its content, and the
//! shared content line follows the block. If the sections disagree on its
//! depth, that line is decoded once per section and placed inside the
//! block in front of the section's closing delimiter. Otherwise it is
//! emitted once after the block, and a block left with no variant lines at
//! all is dropped.

use crate::document::Document;
use crate::error::{FormatError, FormatErrorKind};
use crate::indent::{IndentUnit, Line};
use crate::record::{ConflictMarker, EncodedLine};

/// Upper bound on the indentation of one decoded line, in bytes.
pub const MAX_INDENT_BYTES: usize = 1 << 20;

/// The result of decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub document: Document,
    /// Number of complete conflict blocks passed through.
    pub conflicts: usize,
}

/// Decode a flat sequence of encoded lines.
///
/// Fails on the first line that violates the grammar. A delta that would
/// take the depth below zero, or the indentation past
/// [`MAX_INDENT_BYTES`], is an [`FormatErrorKind::InvalidDelta`]; a delta
/// line with no content line after it is an
/// [`FormatErrorKind::InvalidContent`].
pub fn decode<I, S>(lines: I, indent: &IndentUnit) -> Result<Decoded, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (state, count) = lines.into_iter().enumerate().try_fold(
        (DecodeState::default(), 0),
        |(state, _), (index, line)| {
            let number = index + 1;
            state
                .step(number, line.as_ref(), indent)
                .map(|state| (state, number))
        },
    )?;
    state.finish(count + 1)
}

/// What the next record line must be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    Delta,
    /// A delta was read; the content line will be placed at `depth`.
    Content { depth: usize },
}

/// Position in the record stream of one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor {
    depth: usize,
    expect: Expect,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            depth: 0,
            expect: Expect::Delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Ours = 0,
    Base = 1,
    Theirs = 2,
}

impl Section {
    const ALL: [Section; 3] = [Section::Ours, Section::Base, Section::Theirs];
}

/// Where a section ended: the index its closing delimiter takes in the
/// output, and its side's cursor at that point.
#[derive(Clone, Copy, Debug)]
struct SectionExit {
    section: Section,
    at: usize,
    cursor: Cursor,
}

#[derive(Clone, Debug)]
struct Block {
    /// Output index of the opening delimiter.
    start: usize,
    exits: Vec<SectionExit>,
    section: Section,
    opened_at: usize,
}

/// A closed block whose sections wait for the content line after it.
#[derive(Clone, Debug)]
struct Pending {
    start: usize,
    exits: Vec<SectionExit>,
}

#[derive(Debug, Default)]
struct DecodeState {
    /// Indexed by [`Section`].
    sides: [Cursor; 3],
    block: Option<Block>,
    pending: Option<Pending>,
    lines: Vec<String>,
    conflicts: usize,
}

impl DecodeState {
    /// The sides the next record line belongs to. The first one decides
    /// what is expected and where the line is rendered.
    fn active(&self) -> &'static [Section] {
        match self.block.as_ref().map(|block| block.section) {
            None => &Section::ALL,
            Some(Section::Ours) => &[Section::Ours],
            Some(Section::Base) => &[Section::Base],
            Some(Section::Theirs) => &[Section::Theirs],
        }
    }

    fn step(mut self, number: usize, text: &str, indent: &IndentUnit) -> Result<Self, FormatError> {
        let active = self.active();
        match (EncodedLine::parse(text), self.sides[active[0] as usize].expect) {
            (EncodedLine::Marker(_), _) if self.pending.is_some() => {
                return Err(FormatError::new(
                    FormatErrorKind::InvalidConflict,
                    number,
                    format!("{text:?} follows a conflict block that ends inside a record"),
                ));
            }
            (EncodedLine::Marker(marker), _) => {
                self.enter(marker, number, text)?;
                self.lines.push(text.to_owned());
            }
            (EncodedLine::Delta(delta), Expect::Delta) => {
                for &side in active {
                    let cursor = &mut self.sides[side as usize];
                    let depth = shift(cursor.depth, delta, indent, number, text)?;
                    cursor.expect = Expect::Content { depth };
                }
            }
            (_, Expect::Delta) => {
                return Err(FormatError::unparsed(FormatErrorKind::InvalidDelta, number, text));
            }
            (EncodedLine::Content(remainder), Expect::Content { depth }) => {
                match self.pending.take() {
                    Some(pending) => self.settle(pending, Line { depth, remainder }, indent),
                    None => self.lines.push(Line { depth, remainder }.render(indent)),
                }
                for &side in active {
                    let cursor = &mut self.sides[side as usize];
                    if let Expect::Content { depth } = cursor.expect {
                        *cursor = Cursor {
                            depth,
                            expect: Expect::Delta,
                        };
                    }
                }
            }
            (_, Expect::Content { .. }) => {
                return Err(FormatError::unparsed(
                    FormatErrorKind::InvalidContent,
                    number,
                    text,
                ));
            }
        }
        Ok(self)
    }

    /// Apply a conflict delimiter to the block state.
    fn enter(&mut self, marker: ConflictMarker, number: usize, text: &str) -> Result<(), FormatError> {
        self.block = match (marker, self.block.take()) {
            (ConflictMarker::Start, None) => Some(Block {
                start: self.lines.len(),
                exits: Vec::with_capacity(3),
                section: Section::Ours,
                opened_at: number,
            }),
            (ConflictMarker::Base, Some(mut block)) if block.section == Section::Ours => {
                self.close_section(&mut block);
                block.section = Section::Base;
                Some(block)
            }
            (ConflictMarker::Separator, Some(mut block)) if block.section != Section::Theirs => {
                self.close_section(&mut block);
                block.section = Section::Theirs;
                Some(block)
            }
            (ConflictMarker::End, Some(mut block)) if block.section == Section::Theirs => {
                self.close_section(&mut block);
                self.close(block, number)?;
                None
            }
            _ => {
                return Err(FormatError::unparsed(
                    FormatErrorKind::InvalidConflict,
                    number,
                    text,
                ))
            }
        };
        Ok(())
    }

    /// Called before the closing delimiter is pushed.
    fn close_section(&self, block: &mut Block) {
        block.exits.push(SectionExit {
            section: block.section,
            at: self.lines.len(),
            cursor: self.sides[block.section as usize],
        });
    }

    /// Sections that stop after a delta line all take the content line that
    /// follows the block; a block where only some sections do is malformed.
    fn close(&mut self, block: Block, number: usize) -> Result<(), FormatError> {
        let split = block
            .exits
            .iter()
            .filter(|exit| matches!(exit.cursor.expect, Expect::Content { .. }))
            .count();
        if split != 0 && split != block.exits.len() {
            return Err(FormatError::new(
                FormatErrorKind::InvalidConflict,
                number,
                format!(
                    "sections of the block opened at line {} end at different record boundaries",
                    block.opened_at
                ),
            ));
        }
        // Without a base section the base side is unknown; follow ours.
        if !block.exits.iter().any(|exit| exit.section == Section::Base) {
            self.sides[Section::Base as usize] = self.sides[Section::Ours as usize];
        }
        if split > 0 {
            self.pending = Some(Pending {
                start: block.start,
                exits: block.exits,
            });
        }
        self.conflicts += 1;
        Ok(())
    }

    /// Place the content line that completes a split block. `shared` is
    /// at the "ours" depth.
    fn settle(&mut self, pending: Pending, shared: Line<'_>, indent: &IndentUnit) {
        let depths: Vec<usize> = pending
            .exits
            .iter()
            .map(|exit| match exit.cursor.expect {
                Expect::Content { depth } => depth,
                Expect::Delta => shared.depth,
            })
            .collect();
        if depths.iter().all(|&depth| depth == shared.depth) {
            // Nothing but delimiters: the variants agree after all.
            if self.lines.len() - pending.start == pending.exits.len() + 1 {
                self.lines.truncate(pending.start);
                self.conflicts -= 1;
            }
            self.lines.push(shared.render(indent));
            return;
        }
        // Back to front, so the earlier indices stay valid.
        for (exit, depth) in pending.exits.iter().zip(depths).rev() {
            let line = Line {
                depth,
                remainder: shared.remainder,
            };
            self.lines.insert(exit.at, line.render(indent));
        }
    }

    /// `end` is the line number one past the last input line.
    fn finish(self, end: usize) -> Result<Decoded, FormatError> {
        if let Some(block) = self.block {
            return Err(FormatError::new(
                FormatErrorKind::InvalidConflict,
                end,
                format!("conflict block opened at line {} is not closed", block.opened_at),
            ));
        }
        if let Expect::Content { .. } = self.sides[Section::Ours as usize].expect {
            return Err(FormatError::new(
                FormatErrorKind::InvalidContent,
                end,
                "missing content line after the last delta",
            ));
        }
        Ok(Decoded {
            document: Document::new(self.lines),
            conflicts: self.conflicts,
        })
    }
}

/// Apply `delta` to `depth`, keeping the result non-negative and its
/// indentation within [`MAX_INDENT_BYTES`].
fn shift(
    depth: usize,
    delta: i64,
    indent: &IndentUnit,
    number: usize,
    text: &str,
) -> Result<usize, FormatError> {
    let depth = i64::try_from(depth)
        .ok()
        .and_then(|depth| depth.checked_add(delta))
        .and_then(|depth| usize::try_from(depth).ok())
        .ok_or_else(|| {
            FormatError::new(
                FormatErrorKind::InvalidDelta,
                number,
                format!("{text:?} moves the depth below zero"),
            )
        })?;
    if depth
        .checked_mul(indent.as_str().len())
        .is_some_and(|bytes| bytes <= MAX_INDENT_BYTES)
    {
        Ok(depth)
    } else {
        Err(FormatError::new(
            FormatErrorKind::InvalidDelta,
            number,
            format!("{text:?} indents past {MAX_INDENT_BYTES} bytes"),
        ))
    }
}
