use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use roost_shared::voting::{DOWNVOTE, UPVOTE};

use crate::app::{App, CommunityField, LoginField, PostField, ThreadFocus, View, VimMode};

const THREAD_DEPTH_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

fn thread_depth_color(depth: usize) -> Color {
    THREAD_DEPTH_COLORS[depth % THREAD_DEPTH_COLORS.len()]
}

pub fn draw(f: &mut Frame, app: &App) {
    match app.view {
        View::Login => draw_login(f, app),
        View::VerifyingAuth => draw_loading(f, "Verifying authentication..."),
        View::Feed => draw_feed(f, app),
        View::PostDetail => draw_post_detail(f, app),
        View::Communities => draw_communities(f, app),
        View::CommunityPosts => draw_community_posts(f, app),
        View::CreatePost => draw_create_post(f, app),
        View::CreateCommunity => draw_create_community(f, app),
    }

    if let Some(ref error) = app.error_message {
        draw_error_popup(f, error);
    }

    if app.loading {
        draw_loading_overlay(f, &app.loading_message);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, context: &str) {
    let user_name = app
        .user
        .as_ref()
        .map(|u| u.display_name.as_str())
        .unwrap_or("anonymous");

    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "ROOST",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(context, Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled(user_name, Style::default().fg(Color::DarkGray)),
    ])])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, hints: &str) {
    let (mode, mode_color) = match app.vim_mode {
        VimMode::Normal => ("NORMAL", Color::Blue),
        VimMode::Insert => ("INSERT", Color::Green),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(mode_color).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(status, area);
}

// ============ Login ============

fn draw_login(f: &mut Frame, app: &App) {
    let area = f.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(vertical[1]);

    let form_area = horizontal[1];

    let form_block = Block::default()
        .title(" Sign in ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = form_block.inner(form_area);
    f.render_widget(form_block, form_area);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    let email_style = if app.login_field == LoginField::Email {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let email = Paragraph::new(app.login_email.as_str()).block(
        Block::default()
            .title(" Email ")
            .borders(Borders::ALL)
            .border_style(email_style),
    );
    f.render_widget(email, form_chunks[0]);

    let password_style = if app.login_field == LoginField::Password {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let password_display = "*".repeat(app.login_password.len());
    let password = Paragraph::new(password_display.as_str()).block(
        Block::default()
            .title(" Password ")
            .borders(Borders::ALL)
            .border_style(password_style),
    );
    f.render_widget(password, form_chunks[1]);

    let mode_text = match app.vim_mode {
        VimMode::Normal => "'i' edit | Enter submit | Esc back | 'q' quit",
        VimMode::Insert => "Type to enter | Esc normal | Enter submit",
    };
    let hint = Paragraph::new(mode_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, form_chunks[2]);

    if app.vim_mode == VimMode::Insert {
        let (x, y) = match app.login_field {
            LoginField::Email => (
                form_chunks[0].x + 1 + app.login_email.len() as u16,
                form_chunks[0].y + 1,
            ),
            LoginField::Password => (
                form_chunks[1].x + 1 + app.login_password.len() as u16,
                form_chunks[1].y + 1,
            ),
        };
        f.set_cursor_position((x, y));
    }
}

// ============ Feed ============

fn draw_feed(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, "Recent Posts");
    draw_post_cards(
        f,
        chunks[1],
        " Recent Posts ",
        app.posts.iter().map(|p| (p, None::<&str>)),
        app.selected_post,
    );
    draw_status_bar(
        f,
        chunks[2],
        app,
        "j/k: select | Enter: open | n: new post | c: communities | L: log in/out | q: quit",
    );
}

/// Shared card list for the feed and the community post views. Every card is
/// three lines plus a blank separator; a simple window keeps the selected
/// card visible.
fn draw_post_cards<'a, I>(f: &mut Frame, area: Rect, title: &str, posts: I, selected: usize)
where
    I: Iterator<Item = (&'a roost_shared::Post, Option<&'a str>)>,
{
    let posts: Vec<_> = posts.collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if posts.is_empty() {
        let empty = Paragraph::new("No posts available here")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    const CARD_HEIGHT: usize = 4;
    let visible_cards = (area.height.saturating_sub(2) as usize / CARD_HEIGHT).max(1);
    let first = selected.saturating_sub(visible_cards.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    for (i, (post, community)) in posts.iter().enumerate().skip(first).take(visible_cards) {
        let bg_style = if i == selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut title_spans = vec![Span::styled(
            post.title.clone(),
            bg_style.fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if let Some(name) = community {
            title_spans.push(Span::styled(
                format!("  [{}]", name),
                bg_style.fg(Color::Magenta),
            ));
        }
        lines.push(Line::from(title_spans));

        let content_line = post.content.lines().next().unwrap_or("");
        lines.push(Line::from(Span::styled(
            content_line.to_string(),
            bg_style.fg(Color::Gray),
        )));

        lines.push(Line::from(vec![
            Span::styled(
                format!("Posted on: {}  ", post.created_at.format("%Y-%m-%d %H:%M")),
                bg_style.fg(Color::DarkGray),
            ),
            Span::styled(format!("🩷 {}  ", post.like_count), bg_style),
            Span::styled(format!("💬 {}", post.comment_count), bg_style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);
}

// ============ Communities ============

fn draw_communities(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, "Communities");

    let mut lines: Vec<Line> = Vec::new();
    for (i, community) in app.communities.iter().enumerate() {
        let bg_style = if i == app.selected_community {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            community.name.clone(),
            bg_style.fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            community.description.clone(),
            bg_style.fg(Color::Gray),
        )));
        lines.push(Line::from(Span::styled(
            format!("Created: {}", community.created_at.format("%Y-%m-%d")),
            bg_style.fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .title(" Communities ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, chunks[1]);

    draw_status_bar(
        f,
        chunks[2],
        app,
        "j/k: select | Enter: open | n: new community | Esc: back | q: quit",
    );
}

fn draw_community_posts(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let name = app
        .current_community
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("Community");

    draw_header(f, chunks[0], app, name);
    draw_post_cards(
        f,
        chunks[1],
        &format!(" {} ", name),
        app.community_posts
            .iter()
            .map(|p| (&p.post, Some(p.community_name.as_str()))),
        app.selected_community_post,
    );
    draw_status_bar(f, chunks[2], app, "j/k: select | Enter: open | Esc: back");
}

// ============ Create forms ============

fn field_style(active: bool, mode: VimMode) -> Style {
    if active {
        match mode {
            VimMode::Insert => Style::default().fg(Color::Green),
            VimMode::Normal => Style::default().fg(Color::Yellow),
        }
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_create_post(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, "Create Post");

    let block = Block::default()
        .title(" New Post ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Content
            Constraint::Length(3), // Image path
            Constraint::Length(3), // Community
            Constraint::Length(1), // Message
            Constraint::Min(0),
        ])
        .split(inner);

    let title = Paragraph::new(app.new_post_title.as_str()).block(
        Block::default()
            .title(" Title ")
            .borders(Borders::ALL)
            .border_style(field_style(app.post_field == PostField::Title, app.vim_mode)),
    );
    f.render_widget(title, form_chunks[0]);

    let content = Paragraph::new(app.new_post_content.as_str())
        .block(
            Block::default()
                .title(" Content ")
                .borders(Borders::ALL)
                .border_style(field_style(
                    app.post_field == PostField::Content,
                    app.vim_mode,
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(content, form_chunks[1]);

    let image = Paragraph::new(app.new_post_image_path.as_str()).block(
        Block::default()
            .title(" Image file ")
            .borders(Borders::ALL)
            .border_style(field_style(
                app.post_field == PostField::ImagePath,
                app.vim_mode,
            )),
    );
    f.render_widget(image, form_chunks[2]);

    let community_name = app
        .new_post_community
        .and_then(|i| app.communities.get(i))
        .map(|c| c.name.as_str())
        .unwrap_or("(none)");
    let community = Paragraph::new(community_name).block(
        Block::default()
            .title(" Community (h/l to change) ")
            .borders(Borders::ALL)
            .border_style(field_style(
                app.post_field == PostField::Community,
                app.vim_mode,
            )),
    );
    f.render_widget(community, form_chunks[3]);

    if let Some(ref error) = app.post_form_error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, form_chunks[4]);
    } else if app.post_form_success {
        let message = Paragraph::new("Post created successfully!")
            .style(Style::default().fg(Color::Green));
        f.render_widget(message, form_chunks[4]);
    }

    if app.vim_mode == VimMode::Insert {
        let (chunk, len) = match app.post_field {
            PostField::Title => (form_chunks[0], app.new_post_title.len()),
            PostField::Content => (form_chunks[1], app.new_post_content.len()),
            PostField::ImagePath => (form_chunks[2], app.new_post_image_path.len()),
            PostField::Community => (form_chunks[3], 0),
        };
        f.set_cursor_position((chunk.x + 1 + len as u16, chunk.y + 1));
    }

    draw_status_bar(
        f,
        chunks[2],
        app,
        "Tab: field | i: edit | h/l: community | Enter: submit | Esc: back",
    );
}

fn draw_create_community(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, "Create Community");

    let block = Block::default()
        .title(" New Community ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Description
            Constraint::Length(1), // Message
            Constraint::Min(0),
        ])
        .split(inner);

    let name = Paragraph::new(app.new_community_name.as_str()).block(
        Block::default()
            .title(" Community Name ")
            .borders(Borders::ALL)
            .border_style(field_style(
                app.community_field == CommunityField::Name,
                app.vim_mode,
            )),
    );
    f.render_widget(name, form_chunks[0]);

    let description = Paragraph::new(app.new_community_description.as_str())
        .block(
            Block::default()
                .title(" Community Description ")
                .borders(Borders::ALL)
                .border_style(field_style(
                    app.community_field == CommunityField::Description,
                    app.vim_mode,
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(description, form_chunks[1]);

    if let Some(ref error) = app.community_form_error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, form_chunks[2]);
    }

    if app.vim_mode == VimMode::Insert {
        let (chunk, len) = match app.community_field {
            CommunityField::Name => (form_chunks[0], app.new_community_name.len()),
            CommunityField::Description => (form_chunks[1], app.new_community_description.len()),
        };
        f.set_cursor_position((chunk.x + 1 + len as u16, chunk.y + 1));
    }

    draw_status_bar(
        f,
        chunks[2],
        app,
        "Tab: field | i: edit | Enter: create | Esc: back",
    );
}

// ============ Post detail ============

fn draw_post_detail(f: &mut Frame, app: &App) {
    let Some(post) = app.current_post.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(8), // Post panel
            Constraint::Min(0),    // Discussion
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, &post.title);
    draw_post_panel(f, chunks[1], app, post);
    draw_discussion(f, chunks[2], app);

    let hints = match app.vim_mode {
        VimMode::Normal => {
            "j/k: move | r: reply | c: fold | u/d: vote | n: comment | Esc: back | q: quit"
        }
        VimMode::Insert => "Type comment | Enter: submit | Esc: normal",
    };
    draw_status_bar(f, chunks[3], app, hints);
}

fn vote_button(symbol: &str, count: usize, highlighted: bool) -> Span<'static> {
    let style = if highlighted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("{} {}  ", symbol, count), style)
}

fn draw_post_panel(f: &mut Frame, area: Rect, app: &App, post: &roost_shared::Post) {
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("🖼 {}", post.image_url),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    for content_line in post.content.lines() {
        lines.push(Line::from(content_line.to_string()));
    }

    lines.push(Line::from(Span::styled(
        post.created_at.format("%Y-%m-%d %H:%M").to_string(),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let mut vote_spans = vec![
        vote_button("👍", app.tally.likes, app.tally.highlighted(UPVOTE)),
        vote_button("👎", app.tally.dislikes, app.tally.highlighted(DOWNVOTE)),
    ];
    if let Some(ref error) = app.vote_error {
        vote_spans.push(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(vote_spans));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn draw_discussion(f: &mut Frame, area: Rect, app: &App) {
    let composer_focused = app.thread_focus == ThreadFocus::Composer;
    let has_comment_error = app.comment_error.is_some();

    let mut constraints = vec![Constraint::Length(3)];
    if has_comment_error {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Top-level composer
    if app.user.is_some() {
        let composer = Paragraph::new(app.new_comment.as_str()).block(
            Block::default()
                .title(" Post Comment ")
                .borders(Borders::ALL)
                .border_style(field_style(composer_focused, app.vim_mode)),
        );
        f.render_widget(composer, chunks[0]);

        if composer_focused && app.vim_mode == VimMode::Insert {
            f.set_cursor_position((
                chunks[0].x + 1 + app.new_comment.len() as u16,
                chunks[0].y + 1,
            ));
        }
    } else {
        let prompt = Paragraph::new("Log in to post a comment")
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(prompt, chunks[0]);
    }

    if let Some(ref error) = app.comment_error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[1]);
    }

    let thread_area = if has_comment_error { chunks[2] } else { chunks[1] };
    draw_thread(f, thread_area, app);
}

/// Render the visible thread rows. Every node goes through the same
/// row-building path whatever its depth; collapsed subtrees were already
/// excluded from `thread_rows` by the walk.
fn draw_thread(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Comments ({}) ", app.thread.comment_count()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(ref error) = app.thread_error {
        let message = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(message, area);
        return;
    }

    if app.thread_rows.is_empty() {
        let empty = Paragraph::new("No comments yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;
    let mut cursor_target: Option<(u16, usize)> = None;

    for (row, &(index, depth)) in app.thread_rows.iter().enumerate() {
        let node = app.thread.node(index);
        let comment = &node.comment;
        let indent = "  ".repeat(depth);
        let gutter_color = thread_depth_color(depth);
        let is_selected = row == app.thread_cursor && app.thread_focus == ThreadFocus::Thread;

        if is_selected {
            selected_line = lines.len();
        }

        let author_style = if is_selected {
            Style::default()
                .bg(Color::DarkGray)
                .fg(gutter_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(gutter_color).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(comment.author.clone(), author_style),
            Span::raw("  "),
            Span::styled(
                comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        for content_line in comment.content.lines() {
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::raw(content_line.to_string()),
            ]));
        }

        if node.has_replies() {
            let label = if app.collapsed.contains(&comment.id) {
                format!("▸ Show replies ({})", node.reply_count())
            } else {
                format!("▾ Hide replies ({})", node.reply_count())
            };
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(label, Style::default().fg(Color::DarkGray)),
            ]));
        }

        if app.reply_open.contains(&comment.id) {
            let draft = app
                .reply_drafts
                .get(&comment.id)
                .map(String::as_str)
                .unwrap_or("");

            if is_selected && app.vim_mode == VimMode::Insert {
                let x = (indent.len() + 2 + draft.len()) as u16;
                cursor_target = Some((x, lines.len()));
            }

            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled("↳ ", Style::default().fg(Color::Yellow)),
                Span::raw(draft.to_string()),
            ]));
            if let Some(error) = app.reply_errors.get(&comment.id) {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(error.clone(), Style::default().fg(Color::Red)),
                ]));
            }
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(
                    "Enter: post reply | r: cancel",
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        lines.push(Line::from(""));
    }

    // Keep the selected row inside the viewport.
    let visible_height = area.height.saturating_sub(2) as usize;
    let scroll = if visible_height > 0 && selected_line + 1 > visible_height {
        (selected_line + 1 - visible_height) as u16
    } else {
        0
    };

    if let Some((x, line_index)) = cursor_target {
        let y_offset = line_index as u16;
        if y_offset >= scroll {
            let y = area.y + 1 + (y_offset - scroll);
            if y < area.y + area.height.saturating_sub(1) {
                f.set_cursor_position((area.x + 1 + x, y));
            }
        }
    }

    let thread = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(thread, area);
}

// ============ Overlays ============

fn draw_loading(f: &mut Frame, message: &str) {
    let area = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(block, area);

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);

    let center = centered_rect(50, 20, area);
    f.render_widget(text, center);
}

fn draw_loading_overlay(f: &mut Frame, message: &str) {
    let area = centered_rect(40, 10, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Loading ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(text, area);
}

fn draw_error_popup(f: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
