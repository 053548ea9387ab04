//! Terminal user interface.
//!
//! The controller owns all state; this module decodes keys, draws the
//! current screen on stderr's alternate screen, and awaits the apply phase
//! when the controller asks for it.

pub mod input;
pub mod settings;
pub mod text;
pub mod view;

use std::io::{self, IsTerminal};
use tracing::debug;

use crate::controller::{Controller, Step};
use crate::error::ControllerError;

/// Run the interactive loop until the user quits or leaves the report.
pub async fn run(controller: &mut Controller, color: bool) -> Result<(), ControllerError> {
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Err(ControllerError::NotATerminal);
    }

    let _guard = input::TerminalGuard::acquire()?;
    let mut stderr = io::stderr();
    let mut dirty = true;

    loop {
        if dirty {
            let lines = view::screen_lines(controller, view::terminal_columns());
            view::draw(&mut stderr, &lines, color)?;
            dirty = false;
        }

        let Some(action) = input::next_action()? else {
            continue;
        };
        dirty = true;
        match controller.handle(action) {
            Step::Continue => {}
            Step::Exit => {
                debug!("leaving interactive loop");
                return Ok(());
            }
            Step::Apply => {
                view::draw(&mut stderr, &view::applying_lines(controller), color)?;
                controller.run_apply().await;
            }
        }
    }
}
