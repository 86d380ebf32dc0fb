use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::app::subscription::SubscriptionForm;
use crate::config::{Config, SECTORS};
use crate::error::{AppError, Result};
use crate::fetch::SubscriptionClient;
use crate::ui::{components, styles, TerminalGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Email,
    Sectors,
}

enum Status {
    Info(String),
    Success(String),
    Failure(String),
}

/// Email-subscription form: type an address, toggle sectors, submit once.
/// Validation failures and insert failures both land in the status line;
/// nothing is retried.
pub async fn run_subscribe(config: &Config) -> Result<()> {
    let client = SubscriptionClient::new(config);
    let mut form = SubscriptionForm::new();
    let mut focus = Focus::Email;
    let mut cursor = 0usize;
    let mut status: Option<Status> = None;

    let mut guard = TerminalGuard::new()?;

    loop {
        guard.terminal_mut().draw(|f| {
            draw(f, &form, focus, cursor, status.as_ref());
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(k) = event::read()? else {
            continue;
        };

        match k.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Tab => {
                focus = match focus {
                    Focus::Email => Focus::Sectors,
                    Focus::Sectors => Focus::Email,
                };
            }
            KeyCode::Enter => match form.validate() {
                Ok(request) => {
                    status = Some(Status::Info("Subscribing...".to_string()));
                    guard.terminal_mut().draw(|f| {
                        draw(f, &form, focus, cursor, status.as_ref());
                    })?;

                    match client.submit(&request).await {
                        Ok(()) => {
                            form.reset();
                            status = Some(Status::Success(
                                "Successfully subscribed! You'll receive updates for your \
                                 selected sectors soon."
                                    .to_string(),
                            ));
                        }
                        Err(err) => status = Some(Status::Failure(err.to_string())),
                    }
                }
                Err(AppError::Validation(message)) => {
                    status = Some(Status::Failure(message));
                }
                Err(err) => return Err(err),
            },
            KeyCode::Up | KeyCode::Down if focus == Focus::Sectors => {
                let len = SECTORS.len();
                cursor = match k.code {
                    KeyCode::Up => (cursor + len - 1) % len,
                    _ => (cursor + 1) % len,
                };
            }
            KeyCode::Char(' ') if focus == Focus::Sectors => {
                form.toggle_sector(SECTORS[cursor].id);
            }
            KeyCode::Backspace if focus == Focus::Email => {
                form.email.pop();
            }
            KeyCode::Char(ch) if focus == Focus::Email => {
                form.email.push(ch);
            }
            _ => {}
        }
    }

    guard.restore()?;
    Ok(())
}

fn draw(
    f: &mut Frame,
    form: &SubscriptionForm,
    focus: Focus,
    cursor: usize,
    status: Option<&Status>,
) {
    let chunks = components::split_vertical(
        f.size(),
        &[
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(SECTORS.len() as u16 + 2),
            Constraint::Length(2),
            Constraint::Length(1),
        ],
    );

    let header = Paragraph::new(
        "Stay Ahead in Financial Markets\nCurated insights for your preferred sectors.",
    )
    .style(styles::header_style());
    f.render_widget(header, chunks[0]);

    let email_block = Block::default().borders(Borders::ALL).title(
        if focus == Focus::Email {
            "Email Address (typing)"
        } else {
            "Email Address"
        },
    );
    let email_text = if form.email.is_empty() && focus != Focus::Email {
        Paragraph::new("you@example.com").style(styles::hint_style())
    } else {
        Paragraph::new(form.email.as_str())
    };
    f.render_widget(email_text.block(email_block), chunks[1]);

    let items: Vec<ListItem> = SECTORS
        .iter()
        .enumerate()
        .map(|(i, sector)| {
            let marker = if form.is_selected(sector.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut item = ListItem::new(format!("{} {}", marker, sector.label));
            if focus == Focus::Sectors && i == cursor {
                item = item.style(styles::selection_style());
            }
            item
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select Sectors (Space toggles)"),
    );
    f.render_widget(list, chunks[2]);

    if let Some(status) = status {
        let (message, style) = match status {
            Status::Info(message) => (message.as_str(), styles::hint_style()),
            Status::Success(message) => (message.as_str(), styles::success_style()),
            Status::Failure(message) => (message.as_str(), styles::error_style()),
        };
        f.render_widget(
            Paragraph::new(message).style(style).wrap(Wrap { trim: true }),
            chunks[3],
        );
    }

    let help = Paragraph::new("Tab switch field • ↑/↓ move • Space toggle • Enter subscribe • Esc back")
        .style(styles::hint_style());
    f.render_widget(help, chunks[4]);
}
