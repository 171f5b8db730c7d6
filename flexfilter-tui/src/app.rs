//! Terminal host for a filter session.
//!
//! Plays the rendering surface: keeps keyboard focus, maps terminal input to
//! session actions, and runs deferred work once each frame is laid out.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use flexfilter::{Action, Catalog, FilterSession, Key, RenderSurface, SessionConfig, ValueMap};

use crate::error::AppError;
use crate::render::{self, Frame, Target};
use crate::terminal::Terminal;
use crate::theme::Theme;

/// Which text field receives typed characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    MainSearch,
    Filter(String),
}

/// The parts of the screen the session can act on.
#[derive(Debug)]
struct Surface {
    inputs: Vec<String>,
    focus: Focus,
}

impl RenderSurface for Surface {
    fn focus_filter_input(&mut self, key: &str) -> bool {
        if self.inputs.iter().any(|k| k == key) {
            self.focus = Focus::Filter(key.to_string());
            true
        } else {
            false
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: FilterSession,
    surface: Surface,
    theme: Theme,
    output: Rc<RefCell<ValueMap>>,
    frame: Frame,
    terminal_width: u16,
}

impl App {
    pub fn new(catalog: Catalog, config: SessionConfig) -> Result<Self, AppError> {
        let theme = Theme::from_config(&config.widget)?;
        let output = Rc::new(RefCell::new(ValueMap::new()));
        let sink = output.clone();
        let mut session = FilterSession::new(catalog, config).on_output(move |values| {
            log::info!("output changed: {}", values.to_json());
            *sink.borrow_mut() = values.clone();
        });
        session.mount();

        Ok(Self {
            session,
            surface: Surface {
                inputs: Vec::new(),
                focus: Focus::MainSearch,
            },
            theme,
            output,
            frame: Frame::default(),
            terminal_width: 80,
        })
    }

    /// The last value map emitted by the session.
    pub fn output(&self) -> ValueMap {
        self.output.borrow().clone()
    }

    pub fn run(&mut self, terminal: &mut Terminal) -> Result<(), AppError> {
        self.dispatch(Action::FocusMainSearch);

        loop {
            self.terminal_width = terminal.width()?;
            self.redraw(terminal)?;
            if let Flow::Quit = self.handle(terminal.read()?) {
                break;
            }
        }

        self.session.teardown();
        Ok(())
    }

    fn redraw(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        self.settle();
        terminal.draw(&self.frame)
    }

    /// Lay out the frame, then run deferred work against it.
    fn settle(&mut self) {
        self.layout();
        // Inputs of newly added filters exist only now.
        if self.session.settle(&mut self.surface) > 0 {
            self.layout();
        }
    }

    fn layout(&mut self) {
        let output = self.output.borrow();
        self.frame = render::build(
            &self.session,
            &self.surface.focus,
            &self.theme,
            &output,
            self.terminal_width,
        );
        self.surface.inputs = self.frame.inputs.clone();
    }

    fn dispatch(&mut self, action: Action) {
        let result = self.session.dispatch(action.clone());
        log::trace!("{:?} -> {:?}", action, result);
    }

    fn handle(&mut self, event: CrosstermEvent) -> Flow {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            CrosstermEvent::Mouse(mouse) => {
                self.on_mouse(mouse);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('d') if ctrl => self.remove_focused(),
            KeyCode::Esc => self.dispatch(Action::ClickOutside),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Up => self.dispatch(Action::KeyDown(Key::Up)),
            KeyCode::Down => self.dispatch(Action::KeyDown(Key::Down)),
            KeyCode::Enter => {
                // The input sees Enter before the document does.
                if let Focus::Filter(filter) = self.surface.focus.clone() {
                    self.dispatch(Action::CommitFilterInput(filter));
                }
                self.dispatch(Action::KeyDown(Key::Enter));
            }
            KeyCode::Char(c) if !ctrl => self.edit(|text| text.push(c)),
            KeyCode::Backspace => self.edit(|text| {
                text.pop();
            }),
            _ => self.dispatch(Action::KeyDown(Key::Other)),
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        match self.frame.hit(mouse.column, mouse.row).cloned() {
            Some(Target::Option(index)) => self.dispatch(Action::ClickOption(index)),
            Some(Target::Remove(key)) => self.remove(key),
            Some(Target::Input(key)) => {
                self.surface.focus = Focus::Filter(key.clone());
                self.dispatch(Action::FocusFilterInput(key));
            }
            Some(Target::MainSearch) => {
                self.surface.focus = Focus::MainSearch;
                self.dispatch(Action::FocusMainSearch);
            }
            None if !self.frame.inside_widget(mouse.row) => self.dispatch(Action::ClickOutside),
            None => {}
        }
    }

    /// Apply a text edit to the focused field and report the change.
    fn edit(&mut self, apply: impl FnOnce(&mut String)) {
        match self.surface.focus.clone() {
            Focus::MainSearch => {
                let mut text = self.session.main_query().to_string();
                apply(&mut text);
                self.dispatch(Action::ChangeMainSearch(text));
            }
            Focus::Filter(key) => {
                let mut text = self.session.input_text(&key).to_string();
                apply(&mut text);
                self.dispatch(Action::ChangeFilterInput { key, text });
            }
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let mut targets = vec![Focus::MainSearch];
        targets.extend(self.frame.inputs.iter().cloned().map(Focus::Filter));

        let current = targets
            .iter()
            .position(|f| *f == self.surface.focus)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % targets.len()
        } else {
            (current + targets.len() - 1) % targets.len()
        };

        self.surface.focus = targets[next].clone();
        match targets.swap_remove(next) {
            Focus::MainSearch => self.dispatch(Action::FocusMainSearch),
            Focus::Filter(key) => self.dispatch(Action::FocusFilterInput(key)),
        }
    }

    /// Remove the focused filter, or the last one when the search box has focus.
    fn remove_focused(&mut self) {
        let key = match &self.surface.focus {
            Focus::Filter(key) => Some(key.clone()),
            Focus::MainSearch => self.session.active().iter().last().map(|f| f.key.clone()),
        };
        if let Some(key) = key {
            self.remove(key);
        }
    }

    fn remove(&mut self, key: String) {
        if self.surface.focus == Focus::Filter(key.clone()) {
            self.surface.focus = Focus::MainSearch;
        }
        self.dispatch(Action::ClickRemove(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexfilter::FilterDefinition;
    use serde_json::json;

    fn app() -> App {
        let catalog = Catalog::new([
            FilterDefinition::dropdown("status", "Status", ["Open", "Closed"]),
            FilterDefinition::text("name", "Name"),
        ])
        .unwrap();
        let mut app = App::new(catalog, SessionConfig::default()).unwrap();
        app.dispatch(Action::FocusMainSearch);
        app.settle();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
        app.settle();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_keyboard_flow_picks_filter_and_value() {
        let mut app = app();
        type_text(&mut app, "sta");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.surface.focus, Focus::Filter("status".into()));
        assert!(app.session.suggestions().is_open());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.output().to_json(), json!({ "status": "Closed" }));
    }

    #[test]
    fn test_text_filter_commits_on_enter() {
        let mut app = app();
        type_text(&mut app, "name");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.surface.focus, Focus::Filter("name".into()));

        type_text(&mut app, "Ann");
        assert!(app.output().is_empty());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.output().to_json(), json!({ "name": "Ann" }));
    }

    #[test]
    fn test_ctrl_d_removes_focused_filter() {
        let mut app = app();
        type_text(&mut app, "name");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);

        app.on_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(app.session.active().is_empty());
        assert!(app.output().is_empty());
        assert_eq!(app.surface.focus, Focus::MainSearch);
    }

    #[test]
    fn test_escape_closes_list() {
        let mut app = app();
        assert!(app.session.suggestions().is_open());
        press(&mut app, KeyCode::Esc);
        assert!(!app.session.suggestions().is_open());
    }
}
