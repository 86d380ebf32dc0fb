use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use futures::Future;
use ratatui::{prelude::*, widgets::*};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetch::{Article, ArticleClient, ArticleSummary};
use crate::ui::{components, styles, TerminalGuard};

/// Article browser: loads the index, lets the user pick a slug, and renders
/// the article body read-only. Fetch failures are shown in place and the
/// user backs out with Esc.
pub async fn run_articles(config: &Config) -> Result<()> {
    let client = ArticleClient::new(config);
    let mut guard = TerminalGuard::new()?;

    let index_client = client.clone();
    let summaries = match await_with_loading(&mut guard, "Loading articles...", async move {
        index_client.fetch_articles().await
    })
    .await
    {
        Ok(summaries) => summaries,
        Err(AppError::Cancelled) => {
            guard.restore()?;
            return Ok(());
        }
        Err(err) => {
            show_error(&mut guard, &err)?;
            guard.restore()?;
            return Ok(());
        }
    };

    let mut selected = 0usize;

    loop {
        guard.terminal_mut().draw(|f| {
            draw_index(f, &summaries, selected);
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(k) = event::read()? else {
            continue;
        };

        match k.code {
            KeyCode::Esc | KeyCode::Char('q') => break,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Up | KeyCode::Char('k') if !summaries.is_empty() => {
                selected = (selected + summaries.len() - 1) % summaries.len();
            }
            KeyCode::Down | KeyCode::Char('j') if !summaries.is_empty() => {
                selected = (selected + 1) % summaries.len();
            }
            KeyCode::Enter if !summaries.is_empty() => {
                let slug = summaries[selected].slug.clone();
                let slug_client = client.clone();
                match await_with_loading(&mut guard, "Loading article...", async move {
                    slug_client.fetch_article_by_slug(&slug).await
                })
                .await
                {
                    Ok(article) => read_article(&mut guard, &article)?,
                    Err(AppError::Cancelled) => {}
                    Err(err) => show_error(&mut guard, &err)?,
                }
            }
            _ => {}
        }
    }

    guard.restore()?;
    Ok(())
}

/// Read-only viewer used directly by the `article <slug>` flow.
pub fn read_article(guard: &mut TerminalGuard, article: &Article) -> Result<()> {
    let lines = styled_lines(&article.content);
    let mut scroll = 0u16;
    let max_scroll = lines.len().saturating_sub(1) as u16;

    loop {
        guard.terminal_mut().draw(|f| {
            let chunks = components::split_vertical(
                f.size(),
                &[
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ],
            );

            let header = Paragraph::new(format!(
                "{}\n{} • {}",
                article.article_name, article.sector, article.author
            ))
            .style(styles::header_style());
            f.render_widget(header, chunks[0]);

            let body = Paragraph::new(lines.clone())
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, chunks[1]);

            let help =
                Paragraph::new("↑/↓ scroll • PgUp/PgDn page • Esc back").style(styles::hint_style());
            f.render_widget(help, chunks[2]);
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(k) = event::read()? else {
            continue;
        };

        match k.code {
            KeyCode::Esc | KeyCode::Char('q') => break,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => scroll = (scroll + 1).min(max_scroll),
            KeyCode::PageUp => scroll = scroll.saturating_sub(10),
            KeyCode::PageDown => scroll = (scroll + 10).min(max_scroll),
            _ => {}
        }
    }

    Ok(())
}

/// Emphasize markdown headings and bullets; everything else passes through.
/// A full markdown pipeline is deliberately out of scope.
fn styled_lines(content: &str) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim_start().to_string();
                Line::from(Span::styled(heading, styles::header_style()))
            } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
                Line::from(format!("  • {}", &trimmed[2..]))
            } else {
                Line::from(line.to_string())
            }
        })
        .collect()
}

/// Drive a fetch future to completion while drawing a loading box.
/// Esc cancels: the spawned request is aborted, its eventual result is
/// discarded, and the caller sees `Cancelled`.
async fn await_with_loading<T, F>(guard: &mut TerminalGuard, title: &str, future: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let handle = tokio::spawn(future);

    loop {
        let title = title.to_string();
        guard.terminal_mut().draw(move |f| {
            let area = components::centered_rect(50, 20, f.size());
            f.render_widget(Clear, area);
            let block = Block::default().borders(Borders::ALL).title(title);
            let inner = block.inner(area);
            f.render_widget(block, area);
            f.render_widget(
                Paragraph::new("Esc to cancel")
                    .style(styles::hint_style())
                    .alignment(Alignment::Center),
                inner,
            );
        })?;

        if handle.is_finished() {
            return match handle.await {
                Ok(result) => result,
                Err(err) => Err(AppError::from(err)),
            };
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(k) = event::read()? {
                if matches!(k.code, KeyCode::Esc)
                    || (k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL))
                {
                    handle.abort();
                    return Err(AppError::Cancelled);
                }
            }
        }
    }
}

fn show_error(guard: &mut TerminalGuard, err: &AppError) -> Result<()> {
    let message = err.to_string();

    loop {
        guard.terminal_mut().draw(|f| {
            let area = components::centered_rect(60, 25, f.size());
            f.render_widget(Clear, area);
            let block = Block::default().borders(Borders::ALL).title("Error");
            let inner = block.inner(area);
            f.render_widget(block, area);
            f.render_widget(
                Paragraph::new(message.clone())
                    .style(styles::error_style())
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center),
                inner,
            );
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(_) = event::read()? {
                return Ok(());
            }
        }
    }
}

fn draw_index(f: &mut Frame, summaries: &[ArticleSummary], selected: usize) {
    let chunks = components::split_vertical(
        f.size(),
        &[
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ],
    );

    let header = Paragraph::new("FinList — Articles").style(styles::header_style());
    f.render_widget(header, chunks[0]);

    if summaries.is_empty() {
        f.render_widget(
            Paragraph::new("No articles published yet.")
                .style(styles::hint_style())
                .block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = summaries
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let line = Line::from(vec![
                    Span::styled(
                        summary.article_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{} • {}", summary.sector, summary.author),
                        styles::hint_style(),
                    ),
                ]);
                let mut item = ListItem::new(line);
                if i == selected {
                    item = item.style(styles::selection_style());
                }
                item
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Articles (↑/↓ or j/k)"),
        );
        f.render_widget(list, chunks[1]);
    }

    let help = Paragraph::new("↑/↓ or j/k navigate • Enter open • Esc back")
        .style(styles::hint_style());
    f.render_widget(help, chunks[2]);
}
