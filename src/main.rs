mod games;
mod input;
mod logging;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{debug, error, info};

use games::code_clicker::CodeClickerGame;
use games::Game;
use input::{ClickState, InputEvent};
use time::FrameClock;

/// Convert a pointer position in page pixels into a terminal cell using the
/// grid container's bounding rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.cell_at(
        f64::from(mouse_x) - rect.left(),
        f64::from(mouse_y) - rect.top(),
        rect.width(),
        rect.height(),
    )
}

/// Monotonic milliseconds for the frame clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();
    info!("starting Code Clicker");

    let game = CodeClickerGame::new().map_err(|e| {
        error!(error = %e, "built-in catalog is invalid");
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;
    let game: Rc<RefCell<Box<dyn Game>>> = Rc::new(RefCell::new(Box::new(game)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(FrameClock::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch: resolve the cell, then the target registered there
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                    return;
                };
                let action = cs.hit_test(col, row);
                debug!(col, row, ?action, targets = cs.targets.len(), "click");
                action
            };

            if let Some(action_id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut()
                    .handle_input(&InputEvent::Key(c.to_ascii_lowercase()));
            }
        }
    });

    terminal.draw_web(move |f| {
        let delta = clock.borrow_mut().update(now_ms());
        game.borrow_mut().tick(delta);

        let size = f.area();
        click_state.borrow_mut().begin_frame(size.width, size.height);
        game.borrow().render(f, size, &click_state);
    });

    Ok(())
}
