//! Main UI renderer

use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::api::orders::{kitchen_queue, OrderSummary};
use crate::api::restaurants::{analytics_by_restaurant, PlatformTotals};
use crate::api::system::{format_bytes, format_uptime};
use crate::api::tables::TableStatus;
use crate::core::session::{Dashboard, Section};
use crate::core::table_merge::merged_label;
use crate::tui::app::{App, InputPurpose, LoginField, OrderPane, Remote, Screen};
use crate::tui::theme::Theme;

const SPINNER: &[&str] = &["\u{25d0}", "\u{25d3}", "\u{25d1}", "\u{25d2}"]; // ◐ ◓ ◑ ◒

/// Width of the hour bars on the analytics screen
const BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.input.is_some() {
        render_input_prompt(frame, chunks[1], app);
    }

    if app.error_popup.is_some() {
        render_error_popup(frame, app);
    }

    // Render help overlay on top if active
    if app.show_help {
        render_help_overlay(frame, app);
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let who = app
        .session
        .as_ref()
        .map(|s| format!("{} ({})", s.display_name(), s.role().display_name()))
        .unwrap_or_else(|| "Not signed in".to_string());

    let screen_name = match app.current_screen {
        Screen::Login => "Sign In",
        Screen::Dashboard => app.dashboard().title(),
        Screen::Section(section) => section.title(),
    };

    let live = if app.is_polling() { " │ ● live" } else { "" };
    let title = format!(" resto │ {} │ {}{} ", who, screen_name, live);

    let header = Paragraph::new(title)
        .style(Theme::header())
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Render the main content area based on current screen
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.current_screen {
        Screen::Login => render_login(frame, area, app),
        Screen::Dashboard => render_dashboard(frame, area, app),
        Screen::Section(section) => match section {
            Section::Orders => render_orders(frame, area, app),
            Section::NewOrder => render_new_order(frame, area, app),
            Section::Kitchen => render_kitchen(frame, area, app),
            Section::Tables => render_tables(frame, area, app),
            Section::Inventory => render_inventory(frame, area, app),
            Section::Menu => render_menu(frame, area, app),
            Section::Restaurants => render_restaurants(frame, area, app),
            Section::Users => render_users(frame, area, app),
            Section::Analytics => render_analytics(frame, area, app),
            Section::SystemHealth => render_health(frame, area, app),
            Section::Attendance => render_attendance(frame, area, app),
            Section::Messages => render_messages(frame, area, app),
        },
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split the content area into a list and a one-line help bar
fn with_help_line(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn render_help_line(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(Paragraph::new(format!(" {}", text)).style(Theme::muted()), area);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::normal())
}

/// Placeholder rows while a screen is loading, failed, or empty
fn placeholder<T>(
    remote: &Remote<T>,
    is_empty: bool,
    what: &str,
    tick: u64,
) -> Option<Vec<ListItem<'static>>> {
    if remote.loading && !remote.loaded {
        let spinner = SPINNER[tick as usize % SPINNER.len()];
        return Some(vec![ListItem::new(format!("  {} Loading {}...", spinner, what))]);
    }
    if let Some(err) = &remote.error {
        return Some(vec![
            ListItem::new(format!("  Error: {}", err)).style(Style::default().fg(Theme::ERROR)),
            ListItem::new(""),
            ListItem::new("  Press [r] to retry"),
        ]);
    }
    if is_empty {
        return Some(vec![ListItem::new(format!("  No {} found", what))]);
    }
    None
}

fn selectable(item: ListItem<'static>, selected: bool) -> ListItem<'static> {
    if selected {
        item.style(Theme::selected())
    } else {
        item
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Login and dashboard
// ─────────────────────────────────────────────────────────────────────────────

fn render_login(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.login;
    let popup = centered(area, 60, 14);

    let field_line = |label: &str, value: String, field: LoginField| {
        let focused = form.field == field;
        let cursor = if focused { "▏" } else { "" };
        let style = if focused {
            Style::default().fg(Theme::PRIMARY)
        } else {
            Theme::normal()
        };
        Line::from(vec![
            Span::styled(format!("  {:<16}", label), Theme::muted()),
            Span::styled(format!("{}{}", value, cursor), style),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field_line("Email", form.email.clone(), LoginField::Email),
        field_line(
            "Password",
            "•".repeat(form.password.chars().count()),
            LoginField::Password,
        ),
        field_line(
            "Restaurant slug",
            form.restaurant_slug.clone(),
            LoginField::RestaurantSlug,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Leave the slug empty to sign in as a platform admin",
            Theme::muted(),
        )),
        Line::from(""),
    ];

    if form.submitting {
        let spinner = SPINNER[app.tick_counter as usize % SPINNER.len()];
        lines.push(Line::from(format!("  {} Signing in...", spinner)));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            Style::default().fg(Theme::ERROR),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Tab] Next field  [Enter] Sign in  [Esc] Quit",
        Theme::muted(),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Sign In ")
            .borders(Borders::ALL)
            .border_style(Theme::header()),
    );
    frame.render_widget(paragraph, popup);
}

/// Render the dashboard screen
fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let dashboard = app.dashboard();
    let (list_area, help_area) = with_help_line(area);

    if dashboard == Dashboard::AccessDenied {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Your account has no console access.",
                Style::default().fg(Theme::ERROR),
            )),
            Line::from(""),
            Line::from("  Sign in with a staff or admin account to continue."),
        ])
        .block(bordered(format!(" {} ", dashboard.title())));
        frame.render_widget(message, list_area);
        render_help_line(frame, help_area, "[L] Sign out  [q] Quit");
        return;
    }

    let items: Vec<ListItem> = dashboard
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let item = ListItem::new(format!("  [{}] {}", i + 1, section.title()));
            selectable(item, i == app.dashboard_selection.selected)
        })
        .collect();

    let list = List::new(items).block(bordered(format!(" {} ", dashboard.title())));
    frame.render_widget(list, list_area);
    render_help_line(
        frame,
        help_area,
        "[Enter] Open  [1-9] Jump  [L] Sign out  [q] Quit",
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

fn render_orders(frame: &mut Frame, area: Rect, app: &App) {
    let (body, help_area) = with_help_line(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);
    let list_area = chunks[1];

    let summary = OrderSummary::from_orders(&app.orders.data);
    let summary_line = Paragraph::new(format!(
        "  {} orders │ {} pending │ {} in kitchen │ {} ready │ {} delivered │ {}",
        summary.total,
        summary.pending,
        kitchen_queue(&app.orders.data).len(),
        summary.ready,
        summary.completed,
        app.config.format_amount(summary.revenue)
    ))
    .block(Block::default().borders(Borders::ALL).title(" Today "));
    frame.render_widget(summary_line, chunks[0]);

    let orders = app.visible_orders();

    let items = placeholder(&app.orders, orders.is_empty(), "orders", app.tick_counter)
        .unwrap_or_else(|| {
            orders
                .iter()
                .enumerate()
                .map(|(i, order)| {
                    let text = format!(
                        "  {:<10} {:<10} {:<20} {:>3} items {:>12}  {}",
                        order.label(),
                        order.status.as_str(),
                        truncate(&order.customer_name, 20),
                        order.items.len(),
                        app.config.format_amount(order.total_amount),
                        order
                            .created_at
                            .map(|t| t.format("%H:%M").to_string())
                            .unwrap_or_default()
                    );
                    let item = ListItem::new(text)
                        .style(Style::default().fg(Theme::order_status(order.status)));
                    selectable(item, i == app.orders_selection.selected)
                })
                .collect()
        });

    let filter = app
        .orders_filter
        .map(|s| s.as_str())
        .unwrap_or("all");
    let title = format!(
        " Orders ({}) │ filter: {} │ pay by: {} ",
        orders.len(),
        filter,
        app.payment_method
    );
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    render_help_line(
        frame,
        help_area,
        "[a] Advance  [p] Pay  [m] Payment method  [f] Filter  [r] Refresh  [Esc] Back",
    );
}

fn render_new_order(frame: &mut Frame, area: Rect, app: &App) {
    let (body, help_area) = with_help_line(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body);

    let focus_style = |pane: OrderPane| {
        if app.order_pane == pane {
            Theme::header()
        } else {
            Theme::normal()
        }
    };

    let menu = app.menu_items();
    let menu_items = placeholder(&app.menu, menu.is_empty(), "menu items", app.tick_counter)
        .unwrap_or_else(|| {
            menu.iter()
                .enumerate()
                .map(|(i, item)| {
                    let text = format!(
                        "  {:<26} {:<14} {:>10}",
                        truncate(&item.name, 26),
                        truncate(&item.category, 14),
                        app.config.format_amount(item.price)
                    );
                    selectable(
                        ListItem::new(text),
                        app.order_pane == OrderPane::Menu && i == app.menu_selection.selected,
                    )
                })
                .collect()
        });
    let menu_list = List::new(menu_items).block(
        Block::default()
            .title(" Menu ")
            .borders(Borders::ALL)
            .border_style(focus_style(OrderPane::Menu)),
    );
    frame.render_widget(menu_list, panes[0]);

    let cart = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(panes[1]);

    let lines: Vec<ListItem> = if app.draft.is_empty() {
        vec![ListItem::new("  Cart is empty").style(Theme::muted())]
    } else {
        app.draft
            .lines()
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let text = format!(
                    "  {:>2} × {:<20} {:>10}",
                    line.quantity,
                    truncate(&line.name, 20),
                    app.config.format_amount(line.subtotal())
                );
                selectable(
                    ListItem::new(text),
                    app.order_pane == OrderPane::Cart && i == app.draft_selection.selected,
                )
            })
            .collect()
    };
    let cart_list = List::new(lines).block(
        Block::default()
            .title(format!(" Cart ({} items) ", app.draft.item_count()))
            .borders(Borders::ALL)
            .border_style(focus_style(OrderPane::Cart)),
    );
    frame.render_widget(cart_list, cart[0]);

    let or_dash = |s: &str| {
        if s.is_empty() {
            "-".to_string()
        } else {
            s.to_string()
        }
    };
    let summary = Paragraph::new(vec![
        Line::from(format!("  Customer: {}", or_dash(&app.draft.customer_name))),
        Line::from(format!("  Phone:    {}", or_dash(&app.draft.customer_phone))),
        Line::from(Span::styled(
            format!("  Total:    {}", app.config.format_amount(app.draft.total())),
            Theme::heading(),
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(summary, cart[1]);

    let help = if app.order_submitting {
        "Placing order..."
    } else {
        "[Tab] Switch pane  [Enter] Add  [+/-] Qty  [d] Remove  [n] Name  [t] Phone  [s] Submit  [c] Clear"
    };
    render_help_line(frame, help_area, help);
}

// ─────────────────────────────────────────────────────────────────────────────
// Kitchen
// ─────────────────────────────────────────────────────────────────────────────

fn render_kitchen(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let cards = app.kitchen_cards();
    let now = Utc::now();

    let items = placeholder(&app.kitchen, cards.is_empty(), "tickets", app.tick_counter)
        .unwrap_or_else(|| {
            cards
                .iter()
                .enumerate()
                .map(|(i, card)| {
                    let age = card
                        .age_minutes(now)
                        .map(|m| format!("{}m", m))
                        .unwrap_or_else(|| "-".to_string());
                    let action = card
                        .action
                        .as_ref()
                        .map(|a| format!("[{}]", a.label()))
                        .unwrap_or_default();

                    let mut lines = vec![Line::from(vec![
                        Span::styled(
                            format!("  {:<14}", card.title),
                            Style::default()
                                .fg(Theme::urgency(card.urgency))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(" {:<12} {:>5}  ", card.status, age)),
                        Span::styled(action, Style::default().fg(Theme::PRIMARY)),
                    ])];
                    lines.extend(
                        card.items
                            .iter()
                            .map(|item| Line::from(format!("      {}", item))),
                    );

                    selectable(ListItem::new(lines), i == app.kitchen_selection.selected)
                })
                .collect()
        });

    let title = format!(" Kitchen Board ({}) ", cards.len());
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    render_help_line(
        frame,
        help_area,
        "[Enter] Advance  [p] Priority  [r] Refresh  [Esc] Back",
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

fn render_tables(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let tables = &app.tables.data;
    let merging = app.merge.merge_offered(tables);

    let items = placeholder(&app.tables, tables.is_empty(), "tables", app.tick_counter)
        .unwrap_or_else(|| {
            tables
                .iter()
                .enumerate()
                .map(|(i, table)| {
                    let mark = if !merging || table.status != TableStatus::Available {
                        "   "
                    } else if app.merge.is_selected(&table.id) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    let merged = merged_label(tables, table)
                        .map(|l| format!("merged with {}", l))
                        .unwrap_or_default();
                    let text = format!(
                        "  {} T{:<4} {:<12} seats {:>2}  {:<14} {}",
                        mark,
                        table.table_number,
                        table.status.as_str(),
                        table.capacity,
                        truncate(&table.location, 14),
                        merged
                    );
                    let item = ListItem::new(text)
                        .style(Style::default().fg(Theme::table_status(table.status)));
                    selectable(item, i == app.tables_selection.selected)
                })
                .collect()
        });

    let title = if app.merge.guest_count() > 0 {
        format!(
            " Tables ({}) │ party of {} │ selected seats {} ",
            tables.len(),
            app.merge.guest_count(),
            app.merge.selected_capacity(tables)
        )
    } else {
        format!(" Tables ({}) ", tables.len())
    };
    frame.render_widget(List::new(items).block(bordered(title)), list_area);

    let help = if merging {
        "[Space] Select  [m] Merge  [g] Guests  [s] Status  [Esc] Back"
    } else {
        "[s] Cycle status  [g] Guests  [r] Refresh  [Esc] Back"
    };
    render_help_line(frame, help_area, help);
}

// ─────────────────────────────────────────────────────────────────────────────
// Inventory and menu
// ─────────────────────────────────────────────────────────────────────────────

fn render_inventory(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let items = app.visible_inventory();

    let rows = placeholder(&app.inventory, items.is_empty(), "inventory items", app.tick_counter)
        .unwrap_or_else(|| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let text = format!(
                        "  {} {:<24} {:<14} {:>8.1} {:<6} min {:>6.1}  {:>12}",
                        if item.is_low() { "!" } else { " " },
                        truncate(&item.name, 24),
                        truncate(&item.category, 14),
                        item.current_stock,
                        item.unit,
                        item.min_stock,
                        app.config.format_amount(item.stock_value())
                    );
                    let mut row = ListItem::new(text);
                    if item.is_low() {
                        row = row.style(Style::default().fg(Theme::WARNING));
                    }
                    selectable(row, i == app.inventory_selection.selected)
                })
                .collect()
        });

    let scope = if app.inventory_low_only { "low stock" } else { "all" };
    let title = format!(" Inventory ({}) │ {} ", items.len(), scope);
    frame.render_widget(List::new(rows).block(bordered(title)), list_area);
    render_help_line(
        frame,
        help_area,
        "[+] Restock  [l] Low stock only  [r] Refresh  [Esc] Back",
    );
}

fn render_menu(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let menu = app.menu_items();

    let items = placeholder(&app.menu, menu.is_empty(), "menu items", app.tick_counter)
        .unwrap_or_else(|| {
            menu.iter()
                .enumerate()
                .map(|(i, item)| {
                    let text = format!(
                        "  {:<28} {:<16} {:>10}  {}",
                        truncate(&item.name, 28),
                        truncate(&item.category, 16),
                        app.config.format_amount(item.price),
                        if item.is_available { "" } else { "unavailable" }
                    );
                    let mut row = ListItem::new(text);
                    if !item.is_available {
                        row = row.style(Theme::muted());
                    }
                    selectable(row, i == app.menu_selection.selected)
                })
                .collect()
        });

    let title = format!(" Menu ({}) ", menu.len());
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    render_help_line(frame, help_area, "[j/k] Navigate  [r] Refresh  [Esc] Back");
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform administration
// ─────────────────────────────────────────────────────────────────────────────

fn render_restaurants(frame: &mut Frame, area: Rect, app: &App) {
    let (body, help_area) = with_help_line(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    let totals = PlatformTotals::compute(&app.restaurants.data, &app.restaurant_analytics);
    let summary = Paragraph::new(format!(
        "  {} restaurants ({} active) │ {} orders │ {} revenue",
        totals.restaurants,
        totals.active,
        totals.orders,
        app.config.format_amount(totals.revenue)
    ))
    .block(Block::default().borders(Borders::ALL).title(" Platform "));
    frame.render_widget(summary, chunks[0]);

    let visible = app.visible_restaurants();
    let by_id = analytics_by_restaurant(&app.restaurant_analytics);
    let items = placeholder(&app.restaurants, visible.is_empty(), "restaurants", app.tick_counter)
        .unwrap_or_else(|| {
            visible
                .iter()
                .enumerate()
                .map(|(i, restaurant)| {
                    let stats = by_id.get(restaurant.id.as_str());
                    let text = format!(
                        "  {} {:<26} {:<18} {:<12} {:>6} orders {:>12}",
                        if restaurant.is_active { "●" } else { "○" },
                        truncate(&restaurant.name, 26),
                        truncate(&restaurant.slug, 18),
                        restaurant
                            .subscription_plan
                            .map(|p| p.display_name())
                            .unwrap_or("-"),
                        stats.map(|s| s.total_orders).unwrap_or(0),
                        app.config
                            .format_amount(stats.map(|s| s.total_revenue).unwrap_or(0.0))
                    );
                    let mut row = ListItem::new(text);
                    if !restaurant.is_active {
                        row = row.style(Theme::muted());
                    }
                    selectable(row, i == app.restaurants_selection.selected)
                })
                .collect()
        });

    let title = if app.restaurant_search.is_empty() {
        format!(" Restaurants ({}) ", visible.len())
    } else {
        format!(
            " Restaurants ({}) │ search: {} ",
            visible.len(),
            app.restaurant_search
        )
    };
    frame.render_widget(List::new(items).block(bordered(title)), chunks[1]);
    render_help_line(
        frame,
        help_area,
        "[/] Search  [t] Toggle active  [r] Refresh  [Esc] Back",
    );
}

fn render_users(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let users = &app.users.data;

    let items = placeholder(&app.users, users.is_empty(), "users", app.tick_counter)
        .unwrap_or_else(|| {
            users
                .iter()
                .enumerate()
                .map(|(i, user)| {
                    let text = format!(
                        "  {} {:<22} {:<28} {:<18} {:<10} {}",
                        if user.is_active { "●" } else { "○" },
                        truncate(&user.name, 22),
                        truncate(&user.email, 28),
                        user.role.display_name(),
                        user.shift.map(|s| s.as_str()).unwrap_or("-"),
                        user.restaurant_name.as_deref().unwrap_or("")
                    );
                    let mut row = ListItem::new(text);
                    if !user.is_active {
                        row = row.style(Theme::muted());
                    }
                    selectable(row, i == app.users_selection.selected)
                })
                .collect()
        });

    let title = format!(" Users ({}) ", users.len());
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    render_help_line(
        frame,
        help_area,
        "[t] Toggle active  [r] Refresh  [Esc] Back",
    );
}

/// Lines for a loading, failed, or not-yet-loaded report panel
fn report_placeholder<T>(remote: &Remote<Option<T>>, tick: u64) -> Option<Vec<Line<'static>>> {
    if remote.data.is_some() && remote.error.is_none() {
        return None;
    }
    let line = if let Some(err) = &remote.error {
        Line::from(Span::styled(
            format!("  Error: {}", err),
            Style::default().fg(Theme::ERROR),
        ))
    } else {
        let spinner = SPINNER[tick as usize % SPINNER.len()];
        Line::from(format!("  {} Loading...", spinner))
    };
    Some(vec![Line::from(""), line])
}

fn render_analytics(frame: &mut Frame, area: Rect, app: &App) {
    let (body, help_area) = with_help_line(area);
    let lines = report_placeholder(&app.analytics, app.tick_counter).unwrap_or_else(|| {
        let Some(report) = app.analytics.data.as_ref() else {
            return Vec::new();
        };
        let fmt = |v: f64| app.config.format_amount(v);

        let mut lines = vec![
            Line::from(""),
            Line::from(format!("  Revenue:             {}", fmt(report.total_revenue))),
            Line::from(format!("  Orders:              {}", report.total_orders)),
            Line::from(format!(
                "  Average order value: {}",
                fmt(report.average_order_value())
            )),
            Line::from(format!("  Peak hour:           {}:00", report.peak_hour())),
            Line::from(""),
            Line::from(Span::styled("  Orders by hour", Theme::heading())),
        ];

        for (hour, share) in report.hour_intensity() {
            if share == 0.0 {
                continue;
            }
            let filled = ((share * BAR_WIDTH as f64).round() as usize).max(1);
            lines.push(Line::from(vec![
                Span::raw(format!("  {:02}:00 ", hour)),
                Span::styled("█".repeat(filled), Style::default().fg(Theme::PRIMARY)),
            ]));
        }

        if !report.top_performing_restaurants.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("  Top restaurants", Theme::heading())));
            for (rank, top) in report.top_performing_restaurants.iter().enumerate() {
                lines.push(Line::from(format!(
                    "  {}. {:<24} {:>6} orders {:>12}",
                    rank + 1,
                    truncate(&top.name, 24),
                    top.orders,
                    fmt(top.revenue)
                )));
            }
        }
        lines
    });

    let paragraph = Paragraph::new(lines)
        .block(bordered(" Analytics ".to_string()))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, body);
    render_help_line(frame, help_area, "[r] Refresh  [Esc] Back");
}

fn render_health(frame: &mut Frame, area: Rect, app: &App) {
    let (body, help_area) = with_help_line(area);
    let lines = report_placeholder(&app.health, app.tick_counter).unwrap_or_else(|| {
        let Some(health) = app.health.data.as_ref() else {
            return Vec::new();
        };
        let server = &health.server_status;
        let db = &health.database_status;
        let api = &health.api_metrics;

        let db_status = if db.connected {
            Span::styled("✓ connected", Style::default().fg(Theme::SUCCESS))
        } else {
            Span::styled("✗ disconnected", Style::default().fg(Theme::ERROR))
        };

        vec![
            Line::from(""),
            Line::from(Span::styled("  Server", Theme::heading())),
            Line::from(format!("    Uptime:      {}", format_uptime(server.uptime))),
            Line::from(format!("    CPU:         {:.1}%", server.cpu_usage)),
            Line::from(format!(
                "    Memory:      {} RSS, {} / {} heap",
                format_bytes(server.memory_usage.rss),
                format_bytes(server.memory_usage.heap_used),
                format_bytes(server.memory_usage.heap_total)
            )),
            Line::from(""),
            Line::from(Span::styled("  Database", Theme::heading())),
            Line::from(vec![Span::raw("    Status:      "), db_status]),
            Line::from(format!("    Response:    {:.0}ms", db.response_time)),
            Line::from(format!("    Connections: {}", db.active_connections)),
            Line::from(""),
            Line::from(Span::styled("  API", Theme::heading())),
            Line::from(format!("    Requests:    {}", api.total_requests)),
            Line::from(format!("    Avg time:    {:.0}ms", api.average_response_time)),
            Line::from(format!("    Error rate:  {:.2}%", api.error_rate)),
        ]
    });

    let title = format!(
        " System Health │ every {}s ",
        app.config.poll_interval_secs
    );
    frame.render_widget(Paragraph::new(lines).block(bordered(title)), body);
    render_help_line(frame, help_area, "[r] Refresh now  [Esc] Back");
}

fn render_messages(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let messages = &app.messages.data;

    let items = placeholder(&app.messages, messages.is_empty(), "messages", app.tick_counter)
        .unwrap_or_else(|| {
            messages
                .iter()
                .enumerate()
                .map(|(i, message)| {
                    let sent = message
                        .sent_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let lines = vec![
                        Line::from(format!(
                            "  [{}] {} · {} → {} · {} · read by {}",
                            message.priority.as_str(),
                            message.title,
                            message.kind.as_str(),
                            message.recipients.as_str(),
                            sent,
                            message.read_count()
                        )),
                        Line::from(Span::styled(
                            format!("      {}", truncate(&message.message, 100)),
                            Theme::muted(),
                        )),
                    ];
                    selectable(ListItem::new(lines), i == app.messages_selection.selected)
                })
                .collect()
        });

    let title = format!(" Messages ({}) ", messages.len());
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    render_help_line(frame, help_area, "[j/k] Navigate  [r] Refresh  [Esc] Back");
}

// ─────────────────────────────────────────────────────────────────────────────
// Attendance
// ─────────────────────────────────────────────────────────────────────────────

fn render_attendance(frame: &mut Frame, area: Rect, app: &App) {
    let (list_area, help_area) = with_help_line(area);
    let records = app.visible_attendance();

    let items = placeholder(&app.attendance, records.is_empty(), "attendance records", app.tick_counter)
        .unwrap_or_else(|| {
            records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let text = format!(
                        "  {:<22} {:<12} {:<8} {:<8} {:>7}  {}",
                        truncate(record.staff_name(), 22),
                        record.date_display(),
                        record.check_in_display(),
                        record.check_out_display(),
                        record.hours_display(),
                        record.status.as_str()
                    );
                    selectable(ListItem::new(text), i == app.attendance_selection.selected)
                })
                .collect()
        });

    let scope = if app.attendance_today_only { " │ today" } else { "" };
    let title = format!(
        " Attendance ({}) │ {}{} ",
        records.len(),
        app.attendance_filter.as_str(),
        scope
    );
    frame.render_widget(List::new(items).block(bordered(title)), list_area);
    let help = if app.is_admin() {
        "[i] Check in  [o] Check out  [f] Filter  [t] Today  [r] Refresh  [Esc] Back"
    } else {
        "[f] Filter  [r] Refresh  [Esc] Back"
    };
    render_help_line(frame, help_area, help);
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlays
// ─────────────────────────────────────────────────────────────────────────────

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(msg) = &app.status_message {
        format!(" {}", msg)
    } else if app.session.is_some() {
        format!(" {} │ ? for help ", app.config.effective_api_url())
    } else {
        " Sign in to continue ".to_string()
    };

    let status = Paragraph::new(status_text)
        .style(Theme::status_bar())
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

/// One-line input anchored to the bottom of the content area
fn render_input_prompt(frame: &mut Frame, area: Rect, app: &App) {
    let Some(input) = &app.input else {
        return;
    };
    let height = 3.min(area.height);
    let prompt_area = Rect::new(area.x, area.y + area.height - height, area.width, height);

    frame.render_widget(Clear, prompt_area);
    let hint = match input.purpose {
        InputPurpose::RestaurantSearch => "[Enter] Done  [Esc] Cancel",
        _ => "[Enter] Save  [Esc] Cancel",
    };
    let paragraph = Paragraph::new(format!(" {}▏", input.value)).block(
        Block::default()
            .title(format!(" {} ", input.purpose.label()))
            .title_bottom(Line::from(format!(" {} ", hint)).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::SECONDARY)),
    );
    frame.render_widget(paragraph, prompt_area);
}

fn render_error_popup(frame: &mut Frame, app: &App) {
    let Some(popup) = &app.error_popup else {
        return;
    };
    let area = centered(frame.area(), 60, 9);
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(format!("  {}", popup.message)),
        Line::from(""),
        Line::from(Span::styled("  [Enter] Dismiss", Theme::muted())),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(format!(" {} ", popup.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::ERROR)),
    )
    .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Calculate centered popup area (60% width, 70% height)
    let popup_width = (area.width * 60 / 100).min(60);
    let popup_height = (area.height * 70 / 100).min(20);
    let popup_area = centered(area, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let (title, help_lines) = get_help_content(app.current_screen);

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(Theme::PRIMARY)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::SECONDARY)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help, popup_area);
}

/// Get help content for the current screen
fn get_help_content(screen: Screen) -> (&'static str, Vec<(&'static str, &'static str)>) {
    let Screen::Section(section) = screen else {
        return match screen {
            Screen::Login => (
                "Help - Sign In",
                vec![
                    ("Tab / ↓", "Next field"),
                    ("Shift+Tab", "Previous field"),
                    ("Ctrl+U", "Clear field"),
                    ("Enter", "Sign in"),
                    ("Esc", "Quit"),
                ],
            ),
            _ => (
                "Help - Dashboard",
                vec![
                    ("j / ↓", "Move down"),
                    ("k / ↑", "Move up"),
                    ("Enter", "Open section"),
                    ("1-9", "Jump to section"),
                    ("L", "Sign out"),
                    ("q", "Quit application"),
                    ("?", "Show this help"),
                ],
            ),
        };
    };

    let mut keys = match section {
        Section::Orders => vec![
            ("a / Enter", "Advance order status"),
            ("p", "Take payment"),
            ("m", "Cycle payment method"),
            ("f", "Cycle status filter"),
        ],
        Section::NewOrder => vec![
            ("Tab", "Switch menu / cart"),
            ("Enter", "Add menu item"),
            ("+ / -", "Change quantity"),
            ("d", "Remove line"),
            ("n / t", "Customer name / phone"),
            ("s", "Place order"),
            ("c", "Clear cart"),
        ],
        Section::Kitchen => vec![
            ("Enter", "Advance ticket"),
            ("p", "Cycle order priority"),
        ],
        Section::Tables => vec![
            ("s", "Cycle table status"),
            ("g", "Set party size"),
            ("Space", "Select table to merge"),
            ("m", "Merge selected tables"),
        ],
        Section::Inventory => vec![("+", "Restock item"), ("l", "Toggle low stock")],
        Section::Restaurants => vec![("/", "Search"), ("t", "Toggle active")],
        Section::Users => vec![("t", "Toggle active")],
        Section::Attendance => vec![
            ("i", "Check in (admins)"),
            ("o", "Check out (admins)"),
            ("f", "Cycle filter"),
            ("t", "Today only (admins)"),
        ],
        Section::Menu | Section::Messages | Section::Analytics | Section::SystemHealth => {
            Vec::new()
        }
    };

    keys.extend([
        ("j / k", "Move down / up"),
        ("r", "Refresh"),
        ("Esc", "Go back"),
        ("?", "Show this help"),
    ]);

    (section_help_title(section), keys)
}

fn section_help_title(section: Section) -> &'static str {
    match section {
        Section::Orders => "Help - Orders",
        Section::NewOrder => "Help - New Order",
        Section::Kitchen => "Help - Kitchen Board",
        Section::Tables => "Help - Tables",
        Section::Inventory => "Help - Inventory",
        Section::Menu => "Help - Menu",
        Section::Restaurants => "Help - Restaurants",
        Section::Users => "Help - Users",
        Section::Analytics => "Help - Analytics",
        Section::SystemHealth => "Help - System Health",
        Section::Attendance => "Help - Attendance",
        Section::Messages => "Help - Messages",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Crème brûlée tart", 10), "Crème b...");
    }

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered(area, 60, 4);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.height, 4);
        assert_eq!(popup.y, 3);
    }

    #[test]
    fn test_every_section_has_help() {
        for dashboard in [Dashboard::SuperAdmin, Dashboard::Restaurant] {
            for section in dashboard.sections() {
                let (title, keys) = get_help_content(Screen::Section(*section));
                assert!(title.starts_with("Help - "));
                assert!(keys.iter().any(|(k, _)| *k == "Esc"));
            }
        }
    }
}
