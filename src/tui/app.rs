//! Main TUI application state and logic

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;
use secrecy::SecretString;
use tokio::sync::mpsc;

use crate::api::analytics::{AdvancedAnalytics, AnalyticsHandler};
use crate::api::attendance::{
    filter_records, AttendanceFilter, AttendanceHandler, AttendanceRecord,
};
use crate::api::auth::AuthHandler;
use crate::api::client::{ApiClient, ApiTransport};
use crate::api::communication::{CommunicationHandler, Message};
use crate::api::inventory::{low_stock, InventoryHandler, InventoryItem};
use crate::api::kitchen::{KitchenBoard, KitchenHandler};
use crate::api::menus::{MenuHandler, MenuItem};
use crate::api::orders::{filter_by_status, Order, OrderHandler, OrderStatus, PaymentMethod};
use crate::api::polling::{spawn_poller, PollEvent, PollHandle, PollTarget};
use crate::api::restaurants::{search, Restaurant, RestaurantAnalytics, RestaurantHandler};
use crate::api::system::{SystemHandler, SystemHealth};
use crate::api::tables::{Table, TableHandler, TableStatus};
use crate::api::users::{StaffUser, UserHandler};
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::core::kitchen_board::{cards, BoardCard, CardAction, CardSource};
use crate::core::order_draft::OrderDraft;
use crate::core::session::{Dashboard, Section, Session};
use crate::core::table_merge::{apply_status, merge_summary, MergePlanner};
use crate::error::{RestoError, Result};
use crate::tui::event::{edit_text, is_back_key, is_logout_key, is_quit_key, AppEvent, EventHandler};
use crate::tui::ui;

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// Login succeeded and the session was stored
    LoggedIn(Box<Session>),
    /// Login was rejected
    LoginFailed(String),
    /// The backend no longer accepts the stored token
    SessionExpired,

    // ─────────────────────────────────────────────────────────────────────────
    // Screen data
    // ─────────────────────────────────────────────────────────────────────────
    OrdersLoaded(Vec<Order>),
    MenuLoaded(Vec<MenuItem>),
    KitchenLoaded(KitchenBoard),
    TablesLoaded(Vec<Table>),
    InventoryLoaded(Vec<InventoryItem>),
    RestaurantsLoaded {
        restaurants: Vec<Restaurant>,
        analytics: Vec<RestaurantAnalytics>,
    },
    UsersLoaded(Vec<StaffUser>),
    AnalyticsLoaded(Box<AdvancedAnalytics>),
    HealthLoaded(Box<SystemHealth>),
    AttendanceLoaded(Vec<AttendanceRecord>),
    MessagesLoaded(Vec<Message>),
    /// A screen failed to load
    LoadFailed { section: Section, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────
    /// Table status was saved; apply it to the merged group locally
    TableStatusChanged { table_id: String, status: TableStatus },
    /// A mutation succeeded
    ActionDone {
        message: String,
        refresh: Option<Section>,
    },
    /// A mutation failed; shown in the error popup
    ActionFailed { title: String, error: String },
}

/// How a background request reports failure
#[derive(Debug, Clone)]
enum Failure {
    Load(Section),
    Action(String),
}

/// Current screen in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Section(Section),
}

/// List selection state
#[derive(Debug, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total items in the list
    pub total: usize,
}

impl ListState {
    pub fn new(total: usize) -> Self {
        Self { selected: 0, total }
    }

    pub fn next(&mut self) {
        if self.total > 0 {
            self.selected = (self.selected + 1) % self.total;
        }
    }

    pub fn previous(&mut self) {
        if self.total > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.total - 1);
        }
    }

    /// Resize the list, keeping the selection in range
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if self.selected >= total {
            self.selected = total.saturating_sub(1);
        }
    }
}

/// Data fetched from the backend for one screen
#[derive(Debug, Default)]
pub struct Remote<T> {
    pub data: T,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<T> Remote<T> {
    /// Mark a fetch as started; false when one is already running
    fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    fn finish(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.loaded = true;
        self.error = None;
    }

    fn fail(&mut self, error: String) {
        self.loading = false;
        self.loaded = true;
        self.error = Some(error);
    }
}

/// Error popup for displaying important errors that require user acknowledgment
#[derive(Debug, Clone)]
pub struct ErrorPopup {
    /// Title of the error popup (e.g., "Payment Failed")
    pub title: String,
    /// The full error message to display
    pub message: String,
}

/// Login form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    RestaurantSlug,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::RestaurantSlug,
            LoginField::RestaurantSlug => LoginField::Email,
        }
    }

    fn previous(self) -> Self {
        match self {
            LoginField::Email => LoginField::RestaurantSlug,
            LoginField::Password => LoginField::Email,
            LoginField::RestaurantSlug => LoginField::Password,
        }
    }
}

/// Login screen state
#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    /// Never rendered, only masked
    pub password: String,
    pub restaurant_slug: String,
    pub field: LoginField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::RestaurantSlug => &mut self.restaurant_slug,
        }
    }
}

/// What a one-line input prompt is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    CustomerName,
    CustomerPhone,
    RestockQuantity { item_id: String },
    GuestCount,
    RestaurantSearch,
}

impl InputPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            InputPurpose::CustomerName => "Customer name",
            InputPurpose::CustomerPhone => "Customer phone",
            InputPurpose::RestockQuantity { .. } => "Quantity to add",
            InputPurpose::GuestCount => "Number of guests",
            InputPurpose::RestaurantSearch => "Search restaurants",
        }
    }
}

/// One-line input shown at the bottom of a screen
#[derive(Debug, Clone)]
pub struct InputPrompt {
    pub purpose: InputPurpose,
    pub value: String,
}

/// Which pane of the new-order screen has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPane {
    #[default]
    Menu,
    Cart,
}

/// Live refresh for the kitchen board or system health
struct LivePoll {
    _handle: PollHandle,
    rx: mpsc::Receiver<PollEvent>,
}

/// Main TUI application
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current screen
    pub current_screen: Screen,
    /// Navigation history for back navigation
    pub navigation_stack: Vec<Screen>,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Error popup requiring acknowledgment
    pub error_popup: Option<ErrorPopup>,
    /// Tick counter for the loading spinner
    pub tick_counter: u64,
    /// Loaded configuration
    pub config: Config,

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    pub session: Option<Session>,
    client: Option<Arc<ApiClient>>,
    pub login: LoginForm,
    pub dashboard_selection: ListState,
    /// Active one-line prompt, if any
    pub input: Option<InputPrompt>,

    // ─────────────────────────────────────────────────────────────────────────
    // Async communication
    // ─────────────────────────────────────────────────────────────────────────
    /// Sender for async messages (cloned into tasks)
    pub async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async messages
    pub async_rx: mpsc::Receiver<AsyncMessage>,
    poller: Option<LivePoll>,

    // ─────────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────────
    pub orders: Remote<Vec<Order>>,
    pub orders_selection: ListState,
    pub orders_filter: Option<OrderStatus>,
    pub payment_method: PaymentMethod,

    // ─────────────────────────────────────────────────────────────────────────
    // Menu and new order
    // ─────────────────────────────────────────────────────────────────────────
    pub menu: Remote<Vec<MenuItem>>,
    pub menu_selection: ListState,
    pub draft: OrderDraft,
    pub draft_selection: ListState,
    pub order_pane: OrderPane,
    pub order_submitting: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Kitchen
    // ─────────────────────────────────────────────────────────────────────────
    pub kitchen: Remote<KitchenBoard>,
    pub kitchen_selection: ListState,

    // ─────────────────────────────────────────────────────────────────────────
    // Tables
    // ─────────────────────────────────────────────────────────────────────────
    pub tables: Remote<Vec<Table>>,
    pub tables_selection: ListState,
    pub merge: MergePlanner,

    // ─────────────────────────────────────────────────────────────────────────
    // Inventory
    // ─────────────────────────────────────────────────────────────────────────
    pub inventory: Remote<Vec<InventoryItem>>,
    pub inventory_selection: ListState,
    pub inventory_low_only: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Platform administration
    // ─────────────────────────────────────────────────────────────────────────
    pub restaurants: Remote<Vec<Restaurant>>,
    pub restaurant_analytics: Vec<RestaurantAnalytics>,
    pub restaurants_selection: ListState,
    pub restaurant_search: String,
    pub users: Remote<Vec<StaffUser>>,
    pub users_selection: ListState,
    pub analytics: Remote<Option<AdvancedAnalytics>>,
    pub health: Remote<Option<SystemHealth>>,
    pub messages: Remote<Vec<Message>>,
    pub messages_selection: ListState,

    // ─────────────────────────────────────────────────────────────────────────
    // Attendance
    // ─────────────────────────────────────────────────────────────────────────
    pub attendance: Remote<Vec<AttendanceRecord>>,
    pub attendance_selection: ListState,
    pub attendance_filter: AttendanceFilter,
    pub attendance_today_only: bool,
}

impl App {
    /// Create the app, restoring a stored session when there is one
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let (async_tx, async_rx) = mpsc::channel(100);

        let mut app = Self {
            running: true,
            current_screen: Screen::Login,
            navigation_stack: Vec::new(),
            status_message: None,
            show_help: false,
            error_popup: None,
            tick_counter: 0,
            login: LoginForm {
                restaurant_slug: config.restaurant_slug.clone().unwrap_or_default(),
                ..LoginForm::default()
            },
            config,
            session: None,
            client: None,
            dashboard_selection: ListState::default(),
            input: None,
            async_tx,
            async_rx,
            poller: None,
            orders: Remote::default(),
            orders_selection: ListState::default(),
            orders_filter: None,
            payment_method: PaymentMethod::Cash,
            menu: Remote::default(),
            menu_selection: ListState::default(),
            draft: OrderDraft::new(),
            draft_selection: ListState::default(),
            order_pane: OrderPane::Menu,
            order_submitting: false,
            kitchen: Remote::default(),
            kitchen_selection: ListState::default(),
            tables: Remote::default(),
            tables_selection: ListState::default(),
            merge: MergePlanner::new(),
            inventory: Remote::default(),
            inventory_selection: ListState::default(),
            inventory_low_only: false,
            restaurants: Remote::default(),
            restaurant_analytics: Vec::new(),
            restaurants_selection: ListState::default(),
            restaurant_search: String::new(),
            users: Remote::default(),
            users_selection: ListState::default(),
            analytics: Remote::default(),
            health: Remote::default(),
            messages: Remote::default(),
            messages_selection: ListState::default(),
            attendance: Remote::default(),
            attendance_selection: ListState::default(),
            attendance_filter: AttendanceFilter::All,
            attendance_today_only: false,
        };

        if let Some(session) = Session::load()? {
            app.start_session(session)?;
        }
        Ok(app)
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| RestoError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| RestoError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| RestoError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| RestoError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| RestoError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| RestoError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let mut events = EventHandler::new(Duration::from_millis(250));

        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| RestoError::Terminal(e.to_string()))?;

            while let Ok(msg) = self.async_rx.try_recv() {
                self.handle_async_message(msg);
            }
            self.drain_poller();

            if let Some(event) = events.next().await {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => self.tick_counter = self.tick_counter.wrapping_add(1),
                }
            }
        }

        Self::restore_terminal(&mut terminal)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Install a session and open its dashboard
    fn start_session(&mut self, session: Session) -> Result<()> {
        let client = ApiClient::new(&self.config.effective_api_url(), Some(session.token.clone()))?;
        self.client = Some(Arc::new(client));
        self.dashboard_selection = ListState::new(session.dashboard().sections().len());
        self.status_message = Some(format!(
            "Signed in as {} ({})",
            session.display_name(),
            session.role().display_name()
        ));
        self.session = Some(session);
        self.navigation_stack.clear();
        self.current_screen = Screen::Dashboard;
        Ok(())
    }

    /// Forget the session and return to the login form
    fn end_session(&mut self, message: &str) {
        if let Err(e) = CredentialStore::delete_session() {
            tracing::warn!(error = %e, "failed to delete stored session");
        }
        self.poller = None;
        self.session = None;
        self.client = None;
        self.input = None;
        self.navigation_stack.clear();
        self.current_screen = Screen::Login;
        self.login.password.clear();
        self.login.submitting = false;
        self.status_message = Some(message.to_string());
        self.reset_screen_data();
    }

    fn reset_screen_data(&mut self) {
        self.orders = Remote::default();
        self.menu = Remote::default();
        self.draft.clear();
        self.kitchen = Remote::default();
        self.tables = Remote::default();
        self.merge.clear();
        self.inventory = Remote::default();
        self.restaurants = Remote::default();
        self.restaurant_analytics.clear();
        self.users = Remote::default();
        self.analytics = Remote::default();
        self.health = Remote::default();
        self.messages = Remote::default();
        self.attendance = Remote::default();
    }

    /// Dashboard of the signed-in user
    pub fn dashboard(&self) -> Dashboard {
        self.session
            .as_ref()
            .map(Session::dashboard)
            .unwrap_or(Dashboard::AccessDenied)
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.role().is_admin())
            .unwrap_or(false)
    }

    fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        if self.login.email.trim().is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Email and password are required".to_string());
            return;
        }

        self.login.submitting = true;
        self.login.error = None;
        self.status_message = Some("Signing in...".to_string());

        let url = self.config.effective_api_url();
        let email = self.login.email.trim().to_string();
        let password = std::mem::take(&mut self.login.password);
        let slug = self.login.restaurant_slug.trim().to_string();
        let tx = self.async_tx.clone();

        tokio::spawn(async move {
            let result = async {
                let client = ApiClient::new(&url, None)?;
                let slug = Some(slug.as_str()).filter(|s| !s.is_empty());
                let response = AuthHandler::new(&client)
                    .login(&email, &password, slug)
                    .await?;
                CredentialStore::store_session(&response.token, &response.user)?;
                Ok::<_, RestoError>(Session {
                    token: SecretString::from(response.token),
                    user: Some(response.user),
                })
            }
            .await;

            let msg = match result {
                Ok(session) => AsyncMessage::LoggedIn(Box::new(session)),
                Err(e) => AsyncMessage::LoginFailed(e.to_string()),
            };
            let _ = tx.send(msg).await;
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Background requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a backend request on the runtime and report back over the channel
    fn spawn_api<F, Fut>(&self, failure: Failure, task: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<AsyncMessage>> + Send + 'static,
    {
        let Some(client) = self.client.clone() else {
            return;
        };
        let tx = self.async_tx.clone();

        tokio::spawn(async move {
            let msg = match task(client).await {
                Ok(msg) => msg,
                Err(RestoError::NotAuthenticated) => AsyncMessage::SessionExpired,
                Err(e) => {
                    tracing::warn!(error = %e, "background request failed");
                    match failure {
                        Failure::Load(section) => AsyncMessage::LoadFailed {
                            section,
                            error: e.to_string(),
                        },
                        Failure::Action(title) => AsyncMessage::ActionFailed {
                            title,
                            error: e.to_string(),
                        },
                    }
                }
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Run a mutation that ends with a status message and optional refresh
    fn spawn_action<F, Fut>(&mut self, title: &str, done: String, refresh: Option<Section>, task: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.status_message = Some(format!("{}...", title));
        self.spawn_api(Failure::Action(format!("{} Failed", title)), move |client| async move {
            task(client).await?;
            Ok(AsyncMessage::ActionDone {
                message: done,
                refresh,
            })
        });
    }

    /// Fetch the data behind a section
    pub fn load_section(&mut self, section: Section) {
        match section {
            Section::Orders => {
                if self.orders.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let orders = OrderHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::OrdersLoaded(orders))
                    });
                }
            }
            Section::Menu | Section::NewOrder => {
                if self.menu.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let items = MenuHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::MenuLoaded(items))
                    });
                }
            }
            Section::Kitchen => {
                if self.kitchen.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let board = KitchenHandler::new(client.as_ref()).board().await?;
                        Ok(AsyncMessage::KitchenLoaded(board))
                    });
                }
            }
            Section::Tables => {
                if self.tables.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let tables = TableHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::TablesLoaded(tables))
                    });
                }
            }
            Section::Inventory => {
                if self.inventory.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let items = InventoryHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::InventoryLoaded(items))
                    });
                }
            }
            Section::Restaurants => {
                if self.restaurants.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let handler = RestaurantHandler::new(client.as_ref());
                        let (restaurants, analytics) =
                            tokio::try_join!(handler.list(), handler.analytics())?;
                        Ok(AsyncMessage::RestaurantsLoaded {
                            restaurants,
                            analytics,
                        })
                    });
                }
            }
            Section::Users => {
                if self.users.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let users = UserHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::UsersLoaded(users))
                    });
                }
            }
            Section::Analytics => {
                if self.analytics.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let report = AnalyticsHandler::new(client.as_ref()).advanced().await?;
                        Ok(AsyncMessage::AnalyticsLoaded(Box::new(report)))
                    });
                }
            }
            Section::SystemHealth => {
                if self.health.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let health = SystemHandler::new(client.as_ref()).health().await?;
                        Ok(AsyncMessage::HealthLoaded(Box::new(health)))
                    });
                }
            }
            Section::Attendance => {
                if self.attendance.begin() {
                    let scope = match (self.is_admin(), self.attendance_today_only) {
                        (true, true) => AttendanceScope::Today,
                        (true, false) => AttendanceScope::All,
                        (false, _) => AttendanceScope::Mine,
                    };
                    self.spawn_api(Failure::Load(section), move |client| async move {
                        let handler = AttendanceHandler::new(client.as_ref());
                        let records = match scope {
                            AttendanceScope::All => handler.all().await?,
                            AttendanceScope::Today => handler.today().await?,
                            AttendanceScope::Mine => handler.mine().await?,
                        };
                        Ok(AsyncMessage::AttendanceLoaded(records))
                    });
                }
            }
            Section::Messages => {
                if self.messages.begin() {
                    self.spawn_api(Failure::Load(section), |client| async move {
                        let messages = CommunicationHandler::new(client.as_ref()).list().await?;
                        Ok(AsyncMessage::MessagesLoaded(messages))
                    });
                }
            }
        }
    }

    /// Start polling the kitchen board or system health
    fn start_poller(&mut self, target: PollTarget) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let transport: Arc<dyn ApiTransport> = client;
        let (handle, rx) = spawn_poller(transport, target, self.config.poll_interval());
        self.poller = Some(LivePoll {
            _handle: handle,
            rx,
        });
    }

    fn drain_poller(&mut self) {
        let mut events = Vec::new();
        if let Some(poller) = self.poller.as_mut() {
            while let Ok(event) = poller.rx.try_recv() {
                events.push(event);
            }
        }

        for event in events {
            match event {
                PollEvent::Kitchen(board) => self.set_kitchen(board),
                PollEvent::Health(health) => self.health.finish(Some(health)),
                PollEvent::Error(error) => {
                    self.status_message = Some(format!("Refresh failed: {}", error));
                }
                PollEvent::Unauthorized => {
                    self.end_session("Session expired. Please sign in again.");
                    return;
                }
            }
        }
    }

    /// Handle async message from background tasks
    fn handle_async_message(&mut self, msg: AsyncMessage) {
        match msg {
            AsyncMessage::LoggedIn(session) => {
                self.login.submitting = false;
                self.login.error = None;
                if let Err(e) = self.start_session(*session) {
                    self.login.error = Some(e.to_string());
                }
            }
            AsyncMessage::LoginFailed(error) => {
                self.login.submitting = false;
                self.login.error = Some(error);
                self.status_message = None;
            }
            AsyncMessage::SessionExpired => {
                self.end_session("Session expired. Please sign in again.");
            }
            AsyncMessage::OrdersLoaded(orders) => {
                self.orders.finish(orders);
                self.orders_selection.set_total(self.visible_orders().len());
            }
            AsyncMessage::MenuLoaded(items) => {
                self.menu.finish(items);
                self.menu_selection.set_total(self.menu_items().len());
            }
            AsyncMessage::KitchenLoaded(board) => self.set_kitchen(board),
            AsyncMessage::TablesLoaded(tables) => {
                self.tables.finish(tables);
                self.tables_selection.set_total(self.tables.data.len());
                let guests = self.merge.guest_count();
                self.merge.set_guest_count(guests, &self.tables.data);
            }
            AsyncMessage::InventoryLoaded(items) => {
                self.inventory.finish(items);
                self.inventory_selection.set_total(self.visible_inventory().len());
            }
            AsyncMessage::RestaurantsLoaded {
                restaurants,
                analytics,
            } => {
                self.restaurants.finish(restaurants);
                self.restaurant_analytics = analytics;
                self.restaurants_selection.set_total(self.visible_restaurants().len());
            }
            AsyncMessage::UsersLoaded(users) => {
                self.users.finish(users);
                self.users_selection.set_total(self.users.data.len());
            }
            AsyncMessage::AnalyticsLoaded(report) => self.analytics.finish(Some(*report)),
            AsyncMessage::HealthLoaded(health) => self.health.finish(Some(*health)),
            AsyncMessage::AttendanceLoaded(records) => {
                self.attendance.finish(records);
                self.attendance_selection.set_total(self.visible_attendance().len());
            }
            AsyncMessage::MessagesLoaded(messages) => {
                self.messages.finish(messages);
                self.messages_selection.set_total(self.messages.data.len());
            }
            AsyncMessage::LoadFailed { section, error } => {
                self.status_message = Some(format!("Error: {}", error));
                match section {
                    Section::Orders => self.orders.fail(error),
                    Section::Menu | Section::NewOrder => self.menu.fail(error),
                    Section::Kitchen => self.kitchen.fail(error),
                    Section::Tables => self.tables.fail(error),
                    Section::Inventory => self.inventory.fail(error),
                    Section::Restaurants => self.restaurants.fail(error),
                    Section::Users => self.users.fail(error),
                    Section::Analytics => self.analytics.fail(error),
                    Section::SystemHealth => self.health.fail(error),
                    Section::Attendance => self.attendance.fail(error),
                    Section::Messages => self.messages.fail(error),
                }
            }
            AsyncMessage::TableStatusChanged { table_id, status } => {
                let changed = apply_status(&mut self.tables.data, &table_id, status);
                self.status_message = Some(if changed > 1 {
                    format!("{} merged tables marked {}", changed, status)
                } else {
                    format!("Table marked {}", status)
                });
            }
            AsyncMessage::ActionDone { message, refresh } => {
                self.order_submitting = false;
                self.status_message = Some(message);
                if let Some(section) = refresh {
                    self.load_section(section);
                }
            }
            AsyncMessage::ActionFailed { title, error } => {
                self.order_submitting = false;
                self.status_message = Some(format!("{}: {}", title, error));
                self.error_popup = Some(ErrorPopup {
                    title,
                    message: error,
                });
            }
        }
    }

    fn set_kitchen(&mut self, board: KitchenBoard) {
        self.kitchen.finish(board);
        self.kitchen_selection.set_total(self.kitchen_cards().len());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived views
    // ─────────────────────────────────────────────────────────────────────────

    pub fn visible_orders(&self) -> Vec<&Order> {
        match self.orders_filter {
            Some(status) => filter_by_status(&self.orders.data, status),
            None => self.orders.data.iter().collect(),
        }
    }

    /// Menu items shown on the current screen; new orders only offer available ones
    pub fn menu_items(&self) -> Vec<&MenuItem> {
        let new_order = self.current_screen == Screen::Section(Section::NewOrder);
        self.menu
            .data
            .iter()
            .filter(|item| !new_order || item.is_available)
            .collect()
    }

    pub fn kitchen_cards(&self) -> Vec<BoardCard> {
        cards(&self.kitchen.data)
    }

    pub fn visible_inventory(&self) -> Vec<&InventoryItem> {
        if self.inventory_low_only {
            low_stock(&self.inventory.data)
        } else {
            self.inventory.data.iter().collect()
        }
    }

    pub fn visible_restaurants(&self) -> Vec<&Restaurant> {
        search(&self.restaurants.data, &self.restaurant_search)
    }

    pub fn visible_attendance(&self) -> Vec<&AttendanceRecord> {
        filter_records(&self.attendance.data, self.attendance_filter)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        // If help is shown, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return;
        }

        // If error popup is shown, only allow dismissal keys
        if self.error_popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.error_popup = None;
            }
            return;
        }

        if self.current_screen == Screen::Login {
            self.handle_login_key(key);
            return;
        }

        if self.input.is_some() {
            self.handle_input_key(key);
            return;
        }

        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return;
        }

        if is_logout_key(&key) {
            self.end_session("Signed out.");
            return;
        }

        if is_quit_key(&key) {
            if self.current_screen == Screen::Dashboard {
                self.quit();
            } else {
                self.go_back();
            }
            return;
        }

        if is_back_key(&key) {
            self.go_back();
            return;
        }

        match self.current_screen {
            Screen::Login => {}
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Section(section) => {
                if key.code == KeyCode::Char('r') {
                    self.refresh(section);
                    return;
                }
                match section {
                    Section::Orders => self.handle_orders_key(key),
                    Section::NewOrder => self.handle_new_order_key(key),
                    Section::Kitchen => self.handle_kitchen_key(key),
                    Section::Tables => self.handle_tables_key(key),
                    Section::Inventory => self.handle_inventory_key(key),
                    Section::Menu => self.handle_list_nav(key, Section::Menu),
                    Section::Restaurants => self.handle_restaurants_key(key),
                    Section::Users => self.handle_users_key(key),
                    Section::Attendance => self.handle_attendance_key(key),
                    Section::Messages => self.handle_list_nav(key, Section::Messages),
                    Section::Analytics | Section::SystemHealth => {}
                }
            }
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.login.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::Down => self.login.field = self.login.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.login.field = self.login.field.previous(),
            KeyCode::Enter => self.submit_login(),
            _ => {
                edit_text(self.login.focused_mut(), &key);
            }
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit_input(input);
                }
            }
            _ => {
                edit_text(&mut input.value, &key);
                if input.purpose == InputPurpose::RestaurantSearch {
                    self.restaurant_search = input.value.clone();
                    self.restaurants_selection = ListState::new(self.visible_restaurants().len());
                }
            }
        }
    }

    fn open_input(&mut self, purpose: InputPurpose, value: String) {
        self.input = Some(InputPrompt { purpose, value });
    }

    fn submit_input(&mut self, input: InputPrompt) {
        let value = input.value.trim().to_string();
        match input.purpose {
            InputPurpose::CustomerName => self.draft.customer_name = value,
            InputPurpose::CustomerPhone => self.draft.customer_phone = value,
            InputPurpose::RestockQuantity { item_id } => match value.parse::<f64>() {
                Ok(quantity) if quantity > 0.0 => {
                    self.spawn_action(
                        "Restock",
                        format!("Added {} to stock", quantity),
                        Some(Section::Inventory),
                        move |client| async move {
                            InventoryHandler::new(client.as_ref())
                                .restock(&item_id, quantity)
                                .await
                        },
                    );
                }
                _ => self.status_message = Some("Enter a quantity above zero".to_string()),
            },
            InputPurpose::GuestCount => match value.parse::<u32>() {
                Ok(guests) => {
                    self.merge.set_guest_count(guests, &self.tables.data);
                    self.status_message = Some(if self.merge.merge_offered(&self.tables.data) {
                        format!(
                            "{} guests exceed the largest free table. Select tables with Space",
                            guests
                        )
                    } else {
                        format!("A single free table seats {} guests", guests)
                    });
                }
                Err(_) => self.status_message = Some("Enter a whole number of guests".to_string()),
            },
            InputPurpose::RestaurantSearch => {
                self.restaurant_search = value;
                self.restaurants_selection = ListState::new(self.visible_restaurants().len());
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let sections = self.dashboard().sections();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.dashboard_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.dashboard_selection.previous(),
            KeyCode::Enter => {
                if let Some(section) = sections.get(self.dashboard_selection.selected) {
                    self.navigate_to(Screen::Section(*section));
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = c.to_digit(10).unwrap_or(0) as usize;
                if let Some(section) = index.checked_sub(1).and_then(|i| sections.get(i)) {
                    self.dashboard_selection.selected = index - 1;
                    self.navigate_to(Screen::Section(*section));
                }
            }
            _ => {}
        }
    }

    /// j/k movement for simple list screens
    fn handle_list_nav(&mut self, key: KeyEvent, section: Section) {
        let selection = match section {
            Section::Menu | Section::NewOrder => &mut self.menu_selection,
            Section::Messages => &mut self.messages_selection,
            Section::Users => &mut self.users_selection,
            Section::Restaurants => &mut self.restaurants_selection,
            Section::Inventory => &mut self.inventory_selection,
            Section::Tables => &mut self.tables_selection,
            Section::Kitchen => &mut self.kitchen_selection,
            Section::Orders => &mut self.orders_selection,
            Section::Attendance => &mut self.attendance_selection,
            Section::Analytics | Section::SystemHealth => return,
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => selection.next(),
            KeyCode::Char('k') | KeyCode::Up => selection.previous(),
            _ => {}
        }
    }

    fn handle_orders_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') => {
                self.orders_filter = next_order_filter(self.orders_filter);
                self.orders_selection = ListState::new(self.visible_orders().len());
            }
            KeyCode::Char('m') => {
                let methods = PaymentMethod::ALL;
                let pos = methods
                    .iter()
                    .position(|m| *m == self.payment_method)
                    .unwrap_or(0);
                self.payment_method = methods[(pos + 1) % methods.len()];
                self.status_message = Some(format!("Payment method: {}", self.payment_method));
            }
            KeyCode::Char('a') | KeyCode::Enter => self.advance_selected_order(),
            KeyCode::Char('p') => self.pay_selected_order(),
            _ => self.handle_list_nav(key, Section::Orders),
        }
    }

    fn selected_order(&self) -> Option<Order> {
        self.visible_orders()
            .get(self.orders_selection.selected)
            .map(|o| (*o).clone())
    }

    fn advance_selected_order(&mut self) {
        let Some(order) = self.selected_order() else {
            return;
        };
        let next = match order.status {
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            status => status.next_kitchen_step(),
        };
        let Some(next) = next else {
            self.status_message = Some(format!("{} has no next step", order.label()));
            return;
        };

        self.spawn_action(
            "Update Order",
            format!("{} is now {}", order.label(), next),
            Some(Section::Orders),
            move |client| async move {
                OrderHandler::new(client.as_ref())
                    .update_status(&order.id, next)
                    .await
            },
        );
    }

    fn pay_selected_order(&mut self) {
        let Some(order) = self.selected_order() else {
            return;
        };
        if !order.status.is_payable() {
            self.status_message = Some(format!(
                "{} can be paid once it is READY or DELIVERED",
                order.label()
            ));
            return;
        }

        let method = self.payment_method;
        let done = format!(
            "Payment of {} recorded for {} ({})",
            self.config.format_amount(order.total_amount),
            order.label(),
            method
        );
        self.spawn_action("Payment", done, Some(Section::Orders), move |client| async move {
            OrderHandler::new(client.as_ref())
                .process_payment(&order, method)
                .await
        });
    }

    fn handle_new_order_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.order_pane = match self.order_pane {
                    OrderPane::Menu => OrderPane::Cart,
                    OrderPane::Cart => OrderPane::Menu,
                };
            }
            KeyCode::Char('n') => {
                let current = self.draft.customer_name.clone();
                self.open_input(InputPurpose::CustomerName, current);
            }
            KeyCode::Char('t') => {
                let current = self.draft.customer_phone.clone();
                self.open_input(InputPurpose::CustomerPhone, current);
            }
            KeyCode::Char('s') => self.submit_order(),
            KeyCode::Char('c') => {
                self.draft.clear();
                self.draft_selection = ListState::default();
            }
            _ => match self.order_pane {
                OrderPane::Menu => match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('+') => {
                        let item = self
                            .menu_items()
                            .get(self.menu_selection.selected)
                            .map(|i| (*i).clone());
                        if let Some(item) = item {
                            self.draft.add(&item);
                            self.draft_selection.set_total(self.draft.lines().len());
                            self.status_message = Some(format!("Added {}", item.name));
                        }
                    }
                    _ => self.handle_list_nav(key, Section::NewOrder),
                },
                OrderPane::Cart => {
                    let selected = self
                        .draft
                        .lines()
                        .get(self.draft_selection.selected)
                        .map(|l| (l.menu_id.clone(), l.quantity));
                    match (key.code, selected) {
                        (KeyCode::Char('j') | KeyCode::Down, _) => self.draft_selection.next(),
                        (KeyCode::Char('k') | KeyCode::Up, _) => self.draft_selection.previous(),
                        (KeyCode::Char('+'), Some((id, qty))) => {
                            self.draft.set_quantity(&id, qty + 1)
                        }
                        (KeyCode::Char('-'), Some((id, _))) => self.draft.decrement(&id),
                        (KeyCode::Char('d'), Some((id, _))) => self.draft.remove(&id),
                        _ => {}
                    }
                    self.draft_selection.set_total(self.draft.lines().len());
                }
            },
        }
    }

    fn submit_order(&mut self) {
        if self.order_submitting {
            return;
        }
        let order = match self.draft.to_new_order() {
            Ok(order) => order,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        self.order_submitting = true;
        let done = format!(
            "Order placed for {} ({})",
            self.draft.customer_name,
            self.config.format_amount(self.draft.total())
        );
        self.draft.clear();
        self.draft_selection = ListState::default();
        self.spawn_action("Create Order", done, Some(Section::Orders), move |client| async move {
            OrderHandler::new(client.as_ref()).create(&order).await?;
            Ok(())
        });
    }

    fn handle_kitchen_key(&mut self, key: KeyEvent) {
        let card = self.kitchen_cards().into_iter().nth(self.kitchen_selection.selected);
        match (key.code, card) {
            (KeyCode::Enter | KeyCode::Char('a'), Some(card)) => {
                let Some(action) = card.action else {
                    self.status_message = Some(format!("{} needs no action", card.title));
                    return;
                };
                let done = format!("{}: {}", card.title, action.label());
                self.spawn_action("Kitchen Update", done, Some(Section::Kitchen), move |client| {
                    async move {
                        let handler = KitchenHandler::new(client.as_ref());
                        match action {
                            CardAction::AdvanceKot { kot_id, to } => {
                                handler.update_kot_status(&kot_id, to).await
                            }
                            CardAction::AdvanceOrder { order_id, to } => {
                                handler.update_order_status(&order_id, to).await
                            }
                        }
                    }
                });
            }
            (KeyCode::Char('p'), Some(card)) => match card.source {
                CardSource::Order { id, priority } => {
                    let next = priority.next();
                    let done = format!("{} priority set to {}", card.title, next);
                    self.spawn_action("Priority Update", done, Some(Section::Kitchen), move |client| {
                        async move {
                            KitchenHandler::new(client.as_ref())
                                .update_order_priority(&id, next)
                                .await
                        }
                    });
                }
                CardSource::Kot { .. } => {
                    self.status_message = Some("KOT priority is set by the order".to_string());
                }
            },
            _ => self.handle_list_nav(key, Section::Kitchen),
        }
    }

    fn handle_tables_key(&mut self, key: KeyEvent) {
        let table = self.tables.data.get(self.tables_selection.selected).cloned();
        match (key.code, table) {
            (KeyCode::Char('s') | KeyCode::Enter, Some(table)) => {
                let status = table.status.next();
                let table_id = table.id.clone();
                self.status_message = Some(format!("Updating table {}...", table.table_number));
                self.spawn_api(
                    Failure::Action("Table Update Failed".to_string()),
                    move |client| async move {
                        TableHandler::new(client.as_ref())
                            .update_status(&table_id, status)
                            .await?;
                        Ok(AsyncMessage::TableStatusChanged { table_id, status })
                    },
                );
            }
            (KeyCode::Char('g'), _) => {
                let current = match self.merge.guest_count() {
                    0 => String::new(),
                    n => n.to_string(),
                };
                self.open_input(InputPurpose::GuestCount, current);
            }
            (KeyCode::Char(' '), Some(table)) => {
                if !self.merge.merge_offered(&self.tables.data) {
                    self.status_message = Some(
                        "Set a guest count larger than any free table first [g]".to_string(),
                    );
                } else if table.status != TableStatus::Available {
                    self.status_message =
                        Some(format!("Table {} is not available", table.table_number));
                } else {
                    self.merge.toggle(&table.id);
                }
            }
            (KeyCode::Char('m'), _) => self.submit_merge(),
            _ => self.handle_list_nav(key, Section::Tables),
        }
    }

    fn submit_merge(&mut self) {
        let (ids, guests) = match self.merge.request() {
            Ok(request) => request,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        if !self.merge.capacity_met(&self.tables.data) {
            self.status_message = Some(format!(
                "Selected tables seat {} of {} guests. Merging anyway",
                self.merge.selected_capacity(&self.tables.data),
                guests
            ));
        }

        self.merge.clear();
        self.spawn_api(
            Failure::Action("Merge Failed".to_string()),
            move |client| async move {
                let merged_id = TableHandler::new(client.as_ref())
                    .merge(&ids, guests)
                    .await?;
                tracing::debug!(%merged_id, "tables merged");
                Ok(AsyncMessage::ActionDone {
                    message: merge_summary(ids.len(), guests),
                    refresh: Some(Section::Tables),
                })
            },
        );
    }

    fn handle_inventory_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') => {
                self.inventory_low_only = !self.inventory_low_only;
                self.inventory_selection = ListState::new(self.visible_inventory().len());
            }
            KeyCode::Char('+') | KeyCode::Enter => {
                let item_id = self
                    .visible_inventory()
                    .get(self.inventory_selection.selected)
                    .map(|i| i.id.clone());
                if let Some(item_id) = item_id {
                    self.open_input(InputPurpose::RestockQuantity { item_id }, String::new());
                }
            }
            _ => self.handle_list_nav(key, Section::Inventory),
        }
    }

    fn handle_restaurants_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => {
                let current = self.restaurant_search.clone();
                self.open_input(InputPurpose::RestaurantSearch, current);
            }
            KeyCode::Char(' ') | KeyCode::Char('t') => {
                let restaurant = self
                    .visible_restaurants()
                    .get(self.restaurants_selection.selected)
                    .map(|r| (r.id.clone(), r.name.clone(), r.is_active));
                if let Some((id, name, active)) = restaurant {
                    let done = format!(
                        "{} is now {}",
                        name,
                        if active { "suspended" } else { "active" }
                    );
                    self.spawn_action(
                        "Toggle Restaurant",
                        done,
                        Some(Section::Restaurants),
                        move |client| async move {
                            RestaurantHandler::new(client.as_ref())
                                .toggle_status(&id)
                                .await
                        },
                    );
                }
            }
            _ => self.handle_list_nav(key, Section::Restaurants),
        }
    }

    fn handle_users_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('t') => {
                let user = self.users.data.get(self.users_selection.selected).cloned();
                if let Some(user) = user {
                    let done = format!(
                        "{} is now {}",
                        user.email,
                        if user.is_active { "inactive" } else { "active" }
                    );
                    self.spawn_action("Toggle User", done, Some(Section::Users), move |client| {
                        async move {
                            UserHandler::new(client.as_ref()).toggle_active(&user).await?;
                            Ok(())
                        }
                    });
                }
            }
            _ => self.handle_list_nav(key, Section::Users),
        }
    }

    fn handle_attendance_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') => {
                self.attendance_filter = self.attendance_filter.next();
                self.attendance_selection = ListState::new(self.visible_attendance().len());
            }
            KeyCode::Char('t') if self.is_admin() => {
                self.attendance_today_only = !self.attendance_today_only;
                self.refresh(Section::Attendance);
            }
            KeyCode::Char('i') | KeyCode::Char('o') if !self.is_admin() => {
                self.status_message = Some("Only admins and managers record check-ins".to_string());
            }
            KeyCode::Char('i') => {
                self.spawn_action(
                    "Check In",
                    "Checked in. Have a good shift!".to_string(),
                    Some(Section::Attendance),
                    |client| async move { AttendanceHandler::new(client.as_ref()).check_in().await },
                );
            }
            KeyCode::Char('o') => {
                self.spawn_action(
                    "Check Out",
                    "Checked out.".to_string(),
                    Some(Section::Attendance),
                    |client| async move { AttendanceHandler::new(client.as_ref()).check_out().await },
                );
            }
            _ => self.handle_list_nav(key, Section::Attendance),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Reload a section, ignoring a fetch that is already running
    fn refresh(&mut self, section: Section) {
        self.status_message = Some(format!("Refreshing {}...", section.title()));
        self.load_section(section);
    }

    /// Navigate to a new screen
    pub fn navigate_to(&mut self, screen: Screen) {
        if let Screen::Section(section) = screen {
            let allowed = self
                .session
                .as_ref()
                .map(|s| s.require(section))
                .unwrap_or(Err(RestoError::NotAuthenticated));
            if let Err(e) = allowed {
                self.error_popup = Some(ErrorPopup {
                    title: "Access Denied".to_string(),
                    message: e.to_string(),
                });
                return;
            }
        }

        self.navigation_stack.push(self.current_screen);
        self.current_screen = screen;
        self.status_message = None;

        if let Screen::Section(section) = screen {
            match section {
                Section::Kitchen => self.start_poller(PollTarget::Kitchen),
                Section::SystemHealth => self.start_poller(PollTarget::SystemHealth),
                Section::NewOrder => {
                    self.order_pane = OrderPane::Menu;
                    self.menu_selection = ListState::new(self.menu_items().len());
                    if !self.menu.loaded {
                        self.load_section(section);
                    }
                }
                _ => self.load_section(section),
            }
        }
    }

    /// Go back to the previous screen
    pub fn go_back(&mut self) {
        // Leaving a live screen stops its poller
        self.poller = None;

        if let Some(screen) = self.navigation_stack.pop() {
            self.current_screen = screen;
            self.status_message = None;
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Whether a live poller is running
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }
}

/// Which attendance list a user is allowed to see
#[derive(Debug, Clone, Copy)]
enum AttendanceScope {
    All,
    Today,
    Mine,
}

/// Cycle the order filter: all, then each status in turn
fn next_order_filter(current: Option<OrderStatus>) -> Option<OrderStatus> {
    let all = OrderStatus::ALL;
    match current {
        None => Some(all[0]),
        Some(status) => all
            .iter()
            .position(|s| *s == status)
            .and_then(|pos| all.get(pos + 1))
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_state_wraps() {
        let mut state = ListState::new(3);
        state.previous();
        assert_eq!(state.selected, 2);
        state.next();
        assert_eq!(state.selected, 0);

        let mut empty = ListState::new(0);
        empty.next();
        empty.previous();
        assert_eq!(empty.selected, 0);
    }

    #[test]
    fn test_list_state_set_total_clamps() {
        let mut state = ListState::new(5);
        state.selected = 4;
        state.set_total(2);
        assert_eq!(state.selected, 1);

        state.set_total(0);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_order_filter_cycles_through_statuses() {
        let mut filter = None;
        let mut seen = Vec::new();
        for _ in 0..=OrderStatus::ALL.len() {
            filter = next_order_filter(filter);
            seen.push(filter);
        }
        assert_eq!(seen.first(), Some(&Some(OrderStatus::Pending)));
        assert_eq!(seen.last(), Some(&None));
    }

    #[test]
    fn test_remote_lifecycle() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        assert!(remote.begin());
        assert!(!remote.begin());

        remote.fail("boom".to_string());
        assert!(!remote.loading);
        assert_eq!(remote.error.as_deref(), Some("boom"));

        assert!(remote.begin());
        remote.finish(vec![1, 2]);
        assert!(remote.loaded);
        assert!(remote.error.is_none());
        assert_eq!(remote.data, vec![1, 2]);
    }

    #[test]
    fn test_login_field_cycle() {
        assert_eq!(LoginField::Email.next(), LoginField::Password);
        assert_eq!(LoginField::RestaurantSlug.next(), LoginField::Email);
        assert_eq!(LoginField::Email.previous(), LoginField::RestaurantSlug);
    }
}
