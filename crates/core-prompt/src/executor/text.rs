//! Static text executor: renders its block and commits without input.

use std::io::Write;

use core_terminal::TtyBackend;
use core_text::StyledLine;

use crate::answer::Answer;
use crate::error::Result;
use crate::session::Session;

pub(crate) fn run<B: TtyBackend, W: Write>(
    sess: &mut Session<'_, B, W>,
    lines: &[String],
) -> Result<Option<Answer>> {
    let size = sess.size()?;
    let body: Vec<StyledLine> = lines.iter().map(|l| StyledLine::raw(l.as_str())).collect();
    let row = body.len().saturating_sub(1);
    let col = body.last().map(StyledLine::width).unwrap_or(0);
    sess.draw(&body, row, col, size)?;
    Ok(Some(Answer::Text))
}
