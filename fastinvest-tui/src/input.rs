//! Keyboard input dispatch: global keys, then page-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, FormField, Page};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Global keys.
    match key.code {
        KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::F(1) => {
            app.page = Page::Home;
            return;
        }
        KeyCode::F(2) => {
            app.page = Page::Charts;
            return;
        }
        _ => {}
    }

    // 2. Page-specific keys.
    match app.page {
        Page::Home => handle_home_key(app, key),
        Page::Charts => handle_charts_key(app, key),
    }
}

fn handle_home_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') | KeyCode::Enter | KeyCode::Tab => app.page = Page::Charts,
        _ => {}
    }
}

fn handle_charts_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.form.focus = app.form.focus.next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.focus = app.form.focus.prev();
            return;
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            app.chart = app.chart.next();
            return;
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            app.chart = app.chart.prev();
            return;
        }
        KeyCode::Enter => {
            app.submit_analysis();
            return;
        }
        _ => {}
    }

    let symbol_count = app.symbols.len();
    let form = &mut app.form;

    if form.focus == FormField::Symbol {
        match key.code {
            KeyCode::Left | KeyCode::Char('k') => form.cycle_symbol(symbol_count, false),
            KeyCode::Right | KeyCode::Char('j') => form.cycle_symbol(symbol_count, true),
            _ => {}
        }
    }

    if let Some((text, max_len)) = form.focused_text_mut() {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if text.len() < max_len {
                    text.push(c);
                }
                return;
            }
            KeyCode::Backspace => {
                text.pop();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('h') => app.page = Page::Home,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::renderers::ChartKind;
    use crate::worker::WorkerCommand;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn function_keys_switch_pages() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.page, Page::Charts);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.page, Page::Home);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _, _) = test_app();
        let mut key = KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert_eq!(app.page, Page::Home);
    }

    #[test]
    fn typing_edits_focused_date() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::Start);
        for _ in 0..5 {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "06-30".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.form.start, "2020-06-30");
        // Full field ignores extra digits.
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.form.start, "2020-06-30");
    }

    #[test]
    fn letters_do_not_enter_text_fields() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::F(2));
        app.form.focus = FormField::Window;
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.form.window, "50");
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn arrows_cycle_symbol() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.selected_symbol(&app.symbols), Some("VALE3.SA"));
    }

    #[test]
    fn brackets_cycle_charts() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.chart, ChartKind::PriceVolatility);
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.chart, ChartKind::Table);
    }

    #[test]
    fn enter_submits_from_any_field() {
        let (mut app, cmd_rx, _) = test_app();
        press(&mut app, KeyCode::F(2));
        app.form.focus = FormField::End;
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(WorkerCommand::Analyze { id: 1, .. })
        ));
    }

    #[test]
    fn enter_on_home_opens_charts_without_submitting() {
        let (mut app, cmd_rx, _) = test_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.page, Page::Charts);
        assert!(cmd_rx.try_recv().is_err());
    }
}
