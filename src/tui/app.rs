use std::collections::HashMap;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::graphql::{
    fetch_detail, fetch_page, Characters, DataClient, Dataset, FetchError, Launches, ListPage,
};
use crate::session::{Identity, SessionContext};
use crate::views::{
    DatasetKind, DetailTicket, GateState, GateView, ListTicket, ListView, Route, Screen,
};

/// A fetch result travelling back from a background task.
pub enum ListMsg<D: Dataset> {
    Page(ListTicket, Result<ListPage<D::Item>, FetchError>),
    Detail(DetailTicket, Result<D::Detail, FetchError>),
}

pub enum AppEvent {
    Characters(ListMsg<Characters>),
    Launches(ListMsg<Launches>),
}

/// One configured data client per dataset endpoint.
#[derive(Clone)]
pub struct Clients {
    pub characters: DataClient,
    pub launches: DataClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TaskSlot {
    List(DatasetKind),
    Detail(DatasetKind),
}

pub struct App {
    session: SessionContext,
    session_rx: watch::Receiver<Option<Identity>>,
    route: Route,
    gate: GateView,
    editing: bool,
    characters: ListView<Characters>,
    launches: ListView<Launches>,
    clients: Clients,
    tasks: HashMap<TaskSlot, AbortHandle>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(session: SessionContext, clients: Clients, launches: Launches, route: Route) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut session_rx = session.subscribe();
        session_rx.mark_unchanged();

        let mut app = Self {
            gate: GateView::new(&session),
            session_rx,
            session,
            route: route.canonical(),
            editing: false,
            characters: ListView::new(Arc::new(Characters)),
            launches: ListView::new(Arc::new(launches)),
            clients,
            tasks: HashMap::new(),
            event_tx,
            event_rx,
            should_quit: false,
        };
        app.sync();
        app
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn gate(&self) -> &GateView {
        &self.gate
    }

    pub fn characters(&self) -> &ListView<Characters> {
        &self.characters
    }

    pub fn launches(&self) -> &ListView<Launches> {
        &self.launches
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The view to render. The "edit my info" form takes over any screen.
    pub fn screen(&self) -> Screen {
        if self.editing && self.session.is_present() {
            return Screen::Gate;
        }
        Screen::resolve(&self.route, &self.session)
    }

    /// Changes the address and fetches whatever it now requires.
    pub fn navigate(&mut self, route: Route) {
        let route = route.canonical();
        if route != self.route {
            debug!("Navigating {} -> {}", self.route, route);
        }
        self.route = route;
        self.sync();
    }

    /// Re-checks presence and starts the list fetch for the current address
    /// if it is not already showing.
    pub fn sync(&mut self) {
        if !self.session.is_present() {
            self.abort_all();
            self.characters.reset();
            self.launches.reset();
            // Cached pages must not leak into the next person's session.
            self.clients.characters.reset_cache();
            self.clients.launches.reset_cache();
            self.editing = false;
            if self.gate.state() == GateState::Authenticated {
                self.gate = GateView::new(&self.session);
            }
            return;
        }

        if let Screen::List { dataset, page } = Screen::resolve(&self.route, &self.session) {
            match dataset {
                DatasetKind::Characters => {
                    if let Some(ticket) = self.characters.sync_page(page, &self.session) {
                        let handle = spawn_page(
                            self.clients.characters.clone(),
                            self.characters.dataset().clone(),
                            ticket,
                            self.event_tx.clone(),
                            AppEvent::Characters,
                        );
                        self.track(TaskSlot::List(dataset), handle);
                    }
                }
                DatasetKind::Launches => {
                    if let Some(ticket) = self.launches.sync_page(page, &self.session) {
                        let handle = spawn_page(
                            self.clients.launches.clone(),
                            self.launches.dataset().clone(),
                            ticket,
                            self.event_tx.clone(),
                            AppEvent::Launches,
                        );
                        self.track(TaskSlot::List(dataset), handle);
                    }
                }
            }
        }
    }

    /// Picks up session changes made through other handles.
    pub fn poll_session(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            self.session_rx.mark_unchanged();
            self.sync();
        }
    }

    fn track(&mut self, slot: TaskSlot, handle: AbortHandle) {
        if let Some(previous) = self.tasks.insert(slot, handle) {
            previous.abort();
        }
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    pub fn try_next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Characters(ListMsg::Page(ticket, result)) => {
                self.characters.apply_page(ticket, result);
            }
            AppEvent::Characters(ListMsg::Detail(ticket, result)) => {
                self.characters.apply_detail(ticket, result);
            }
            AppEvent::Launches(ListMsg::Page(ticket, result)) => {
                self.launches.apply_page(ticket, result);
            }
            AppEvent::Launches(ListMsg::Detail(ticket, result)) => {
                self.launches.apply_detail(ticket, result);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen() {
            Screen::Gate => self.handle_gate_key(key),
            Screen::List { dataset, .. } => self.handle_list_key(dataset, key),
            Screen::NotFound(_) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Enter | KeyCode::Char('h') => self.navigate(Route::Home),
                _ => {}
            },
        }
    }

    fn handle_gate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.gate.toggle_focus()
            }
            KeyCode::Char(c) => self.gate.input_char(c),
            KeyCode::Backspace => self.gate.backspace(),
            KeyCode::Enter => {
                if self.gate.submit(&self.session).is_ok() {
                    self.editing = false;
                    self.session_rx.mark_unchanged();
                    self.sync();
                }
            }
            KeyCode::Esc if self.editing => {
                self.editing = false;
                self.gate = GateView::new(&self.session);
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_list_key(&mut self, dataset: DatasetKind, key: KeyEvent) {
        let overlay_open = match dataset {
            DatasetKind::Characters => self.characters.detail().is_some(),
            DatasetKind::Launches => self.launches.detail().is_some(),
        };

        match key.code {
            KeyCode::Esc if overlay_open => self.close_detail(dataset),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ if overlay_open => {}
            KeyCode::Up | KeyCode::Char('k') => match dataset {
                DatasetKind::Characters => self.characters.select_previous(),
                DatasetKind::Launches => self.launches.select_previous(),
            },
            KeyCode::Down | KeyCode::Char('j') => match dataset {
                DatasetKind::Characters => self.characters.select_next(),
                DatasetKind::Launches => self.launches.select_next(),
            },
            KeyCode::Enter => self.open_selected(dataset),
            KeyCode::Left | KeyCode::Char('p') => {
                let target = match dataset {
                    DatasetKind::Characters => self.characters.previous_page(),
                    DatasetKind::Launches => self.launches.previous_page(),
                };
                if let Some(page) = target {
                    self.navigate(self.route.with_page(page));
                }
            }
            KeyCode::Right | KeyCode::Char('n') => {
                let target = match dataset {
                    DatasetKind::Characters => self.characters.next_page(),
                    DatasetKind::Launches => self.launches.next_page(),
                };
                if let Some(page) = target {
                    self.navigate(self.route.with_page(page));
                }
            }
            KeyCode::Char('1') => self.navigate(Route::list(DatasetKind::Characters, 1)),
            KeyCode::Char('2') => self.navigate(Route::list(DatasetKind::Launches, 1)),
            KeyCode::Char('r') => {
                match dataset {
                    DatasetKind::Characters => self.characters.invalidate(),
                    DatasetKind::Launches => self.launches.invalidate(),
                }
                self.sync();
            }
            KeyCode::Char('e') => {
                self.gate = GateView::edit(&self.session);
                self.editing = true;
            }
            KeyCode::Char('o') => self.sign_out(),
            _ => {}
        }
    }

    fn open_selected(&mut self, dataset: DatasetKind) {
        let handle = match dataset {
            DatasetKind::Characters => self.characters.open_selected(&self.session).map(|ticket| {
                spawn_detail(
                    self.clients.characters.clone(),
                    self.characters.dataset().clone(),
                    ticket,
                    self.event_tx.clone(),
                    AppEvent::Characters,
                )
            }),
            DatasetKind::Launches => self.launches.open_selected(&self.session).map(|ticket| {
                spawn_detail(
                    self.clients.launches.clone(),
                    self.launches.dataset().clone(),
                    ticket,
                    self.event_tx.clone(),
                    AppEvent::Launches,
                )
            }),
        };
        if let Some(handle) = handle {
            self.track(TaskSlot::Detail(dataset), handle);
        }
    }

    fn close_detail(&mut self, dataset: DatasetKind) {
        if let Some(handle) = self.tasks.remove(&TaskSlot::Detail(dataset)) {
            handle.abort();
        }
        match dataset {
            DatasetKind::Characters => self.characters.close_detail(),
            DatasetKind::Launches => self.launches.close_detail(),
        }
    }

    pub fn sign_out(&mut self) {
        info!("Sign-out requested from {}", self.route);
        self.session.sign_out();
        self.session_rx.mark_unchanged();
        self.sync();
    }
}

fn spawn_page<D: Dataset>(
    client: DataClient,
    dataset: Arc<D>,
    ticket: ListTicket,
    tx: mpsc::UnboundedSender<AppEvent>,
    wrap: fn(ListMsg<D>) -> AppEvent,
) -> AbortHandle {
    tokio::spawn(async move {
        let result = fetch_page(&client, dataset.as_ref(), ticket.page, ticket.policy).await;
        let _ = tx.send(wrap(ListMsg::Page(ticket, result)));
    })
    .abort_handle()
}

fn spawn_detail<D: Dataset>(
    client: DataClient,
    dataset: Arc<D>,
    ticket: DetailTicket,
    tx: mpsc::UnboundedSender<AppEvent>,
    wrap: fn(ListMsg<D>) -> AppEvent,
) -> AbortHandle {
    tokio::spawn(async move {
        let result = fetch_detail(&client, dataset.as_ref(), &ticket.id).await;
        let _ = tx.send(wrap(ListMsg::Detail(ticket, result)));
    })
    .abort_handle()
}
