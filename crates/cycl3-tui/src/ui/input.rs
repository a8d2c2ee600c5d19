//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cycl3_core::Route;

use crate::app::{
    can_add_draft_char, can_add_identifier_char, can_add_password_char, can_add_query_char, App,
    AppState, LoginFocus, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match app.state {
        AppState::Searching => return Ok(handle_search_input(app, key)),
        AppState::Composing => return Ok(handle_compose_input(app, key)),
        AppState::FindingActors => return Ok(handle_actor_query_input(app, key)),
        _ => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        _ => {}
    }

    // Signed out: only the login form is reachable
    if app.route == Route::Login {
        if key.code == KeyCode::Enter {
            app.start_login();
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('1') => app.navigate(Route::Feed),
        KeyCode::Char('2') => app.navigate(Route::Messages),
        KeyCode::Char('3') => app.navigate(Route::Functions),
        KeyCode::Left => app.navigate(app.route.prev()),
        KeyCode::Right => app.navigate(app.route.next()),
        KeyCode::Char('L') => app.logout(),
        _ => match app.route {
            Route::Feed => handle_feed_keys(app, key),
            Route::Functions => handle_functions_keys(app, key),
            Route::Messages | Route::Login => {}
        },
    }

    Ok(false)
}

fn handle_feed_keys(app: &mut App, key: KeyEvent) {
    let len = app.visible_posts().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.feed_selection = app.feed_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.feed_selection + 1 < len {
                app.feed_selection += 1;
            }
        }
        KeyCode::PageUp => {
            app.feed_selection = app.feed_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.feed_selection = (app.feed_selection + PAGE_SCROLL_SIZE).min(len.saturating_sub(1));
        }
        KeyCode::Home => app.feed_selection = 0,
        KeyCode::End => app.feed_selection = len.saturating_sub(1),
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('c') => app.state = AppState::Composing,
        KeyCode::Char('o') => app.open_selected_image(),
        KeyCode::Char('u') => {
            if !app.feed.is_loading() {
                app.load_feed();
            }
        }
        KeyCode::Esc => {
            app.feed.search_term.clear();
            app.feed_selection = 0;
        }
        _ => {}
    }
}

fn handle_functions_keys(app: &mut App, key: KeyEvent) {
    let selection = app.functions.selection;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.functions.select(selection.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => app.functions.select(selection + 1),
        KeyCode::Char('/') => app.state = AppState::FindingActors,
        KeyCode::Enter => {
            if !app.functions.busy {
                app.load_selected_profile();
            }
        }
        KeyCode::Char('f') => {
            if !app.functions.busy {
                app.follow_selected();
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.feed.search_term.clear();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // Keep search term active
        }
        KeyCode::Backspace => {
            app.feed.search_term.pop();
        }
        KeyCode::Char(c) => {
            app.feed.search_term.push(c);
        }
        _ => {}
    }
    // Reset selection when search changes
    app.feed_selection = 0;
    false
}

fn handle_compose_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Draft is kept for later
            app.state = AppState::Normal;
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.feed.draft.push('\n');
        }
        KeyCode::Enter => {
            app.submit_post();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.feed.draft.pop();
        }
        KeyCode::Char(c) => {
            if can_add_draft_char(c) {
                app.feed.draft.push(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_actor_query_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.search_actors();
        }
        KeyCode::Backspace => {
            app.functions.query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_query_char(app.functions.query.chars().count(), c) {
                app.functions.query.push(c);
            }
        }
        _ => {}
    }
    false
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            // Move to next field
            app.login_focus = match app.login_focus {
                LoginFocus::Identifier => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Identifier,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            // Move to previous field
            app.login_focus = match app.login_focus {
                LoginFocus::Identifier => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Identifier,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Identifier => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                // On failure login_error is set and the form stays up
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Identifier => {
                app.login_identifier.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Identifier => {
                if can_add_identifier_char(app.login_identifier.chars().count(), c) {
                    app.login_identifier.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}
