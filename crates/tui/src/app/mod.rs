use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent};
use ethers_core::types::{Address, U256};

use engine::{EntryKind, Ledger, MoneyCents, Session};

use crate::{
    client::{ClientError, Provider, contract::Contract},
    config::AppConfig,
    error::{AppError, Result},
    ui,
    ui::keymap::AppAction,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connect,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeMode {
    View,
    AddEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Amount,
    Description,
}

/// Input state of the new-entry form.
#[derive(Debug)]
pub struct EntryForm {
    pub amount: String,
    pub description: String,
    pub kind: EntryKind,
    pub focus: EntryField,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            description: String::new(),
            // The reference behavior defaults to income.
            kind: EntryKind::Income,
            focus: EntryField::Amount,
        }
    }
}

impl EntryForm {
    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            EntryField::Amount => &mut self.amount,
            EntryField::Description => &mut self.description,
        }
    }

    pub fn advance_focus(&mut self) {
        self.focus = match self.focus {
            EntryField::Amount => EntryField::Description,
            EntryField::Description => EntryField::Amount,
        };
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.other();
    }

    pub fn clear(&mut self) {
        self.amount.clear();
        self.description.clear();
        self.focus = EntryField::Amount;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct ConnectState {
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub session: Session,
    /// Last fetched contract balance; stale until the next explicit fetch.
    pub balance: Option<U256>,
    pub ledger: Ledger,
    pub mode: HomeMode,
    pub form: EntryForm,
    /// Which of the two ledger lists holds the selection.
    pub list_kind: EntryKind,
    pub selected: usize,
    pub connect: ConnectState,
    pub toast: Option<ToastState>,
    pub last_refresh: Option<DateTime<Local>>,
    pub wallet_url: String,
}

pub struct App {
    config: AppConfig,
    provider: Provider,
    contract_address: Address,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider = Provider::new(&config.wallet_url)?;
        let contract_address = config
            .contract
            .parse::<Address>()
            .map_err(|err| AppError::Terminal(format!("invalid contract address: {err}")))?;

        let state = AppState {
            screen: Screen::Connect,
            session: Session::new(),
            balance: None,
            ledger: Ledger::new(),
            mode: HomeMode::View,
            form: EntryForm::default(),
            list_kind: EntryKind::Income,
            selected: 0,
            connect: ConnectState { message: None },
            toast: None,
            last_refresh: None,
            wallet_url: config.wallet_url.clone(),
        };

        Ok(Self {
            config,
            provider,
            contract_address,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.startup().await;
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    /// Silent discovery at startup: no prompts, nothing surfaced as a
    /// failure. Absence of a wallet is an informational condition.
    async fn startup(&mut self) {
        if !self.provider.detect().await {
            self.state.connect.message = Some(
                "Nessun wallet rilevato. Installa un wallet per usare lo sportello.".to_string(),
            );
            return;
        }
        self.state.session.detect_provider();

        match self.provider.accounts().await {
            Ok(accounts) => {
                if let Some(account) = accounts.first().copied() {
                    if let Err(err) = self.adopt_account(account).await {
                        tracing::debug!(?err, "startup binding failed");
                    }
                }
            }
            Err(err) => {
                tracing::debug!(?err, "eth_accounts failed at startup");
            }
        }
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.expire_toast();
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let editing = self.state.screen == Screen::Home && self.state.mode == HomeMode::AddEntry;

        match ui::keymap::map_key(key, editing) {
            AppAction::Quit => {
                self.should_quit = true;
            }
            AppAction::Cancel => {
                if editing {
                    self.state.form.clear();
                    self.state.mode = HomeMode::View;
                }
            }
            AppAction::NextField => {
                if editing {
                    self.state.form.advance_focus();
                } else if self.state.screen == Screen::Home {
                    self.state.list_kind = self.state.list_kind.other();
                    self.state.selected = 0;
                }
            }
            AppAction::Submit => {
                if self.state.screen == Screen::Connect {
                    self.attempt_connect().await;
                } else if editing {
                    self.submit_entry();
                }
            }
            AppAction::Backspace => {
                if editing {
                    self.state.form.active_field_mut().pop();
                }
            }
            AppAction::Up => {
                if !editing && self.state.screen == Screen::Home {
                    self.select_prev();
                }
            }
            AppAction::Down => {
                if !editing && self.state.screen == Screen::Home {
                    self.select_next();
                }
            }
            AppAction::Left | AppAction::Right => {
                if editing {
                    self.state.form.toggle_kind();
                }
            }
            AppAction::Input(ch) => {
                if editing {
                    self.state.form.active_field_mut().push(ch);
                } else {
                    self.handle_action_key(ch).await;
                }
            }
            AppAction::None => {}
        }
    }

    async fn handle_action_key(&mut self, ch: char) {
        match ch {
            'c' | 'C' => {
                if self.state.screen == Screen::Connect {
                    self.attempt_connect().await;
                }
            }
            'd' | 'D' => {
                if self.state.screen == Screen::Home {
                    self.deposit().await;
                }
            }
            'w' | 'W' => {
                if self.state.screen == Screen::Home {
                    self.withdraw().await;
                }
            }
            'r' | 'R' => {
                if self.state.screen == Screen::Home {
                    self.refresh_balance().await;
                }
            }
            'a' | 'A' => {
                if self.state.screen == Screen::Home {
                    self.state.mode = HomeMode::AddEntry;
                }
            }
            'x' | 'X' => {
                if self.state.screen == Screen::Home {
                    self.remove_selected();
                }
            }
            _ => {}
        }
    }

    /// Explicit, user-triggered wallet authorization.
    ///
    /// With no provider detected this reports the blocking condition and
    /// issues no network call at all.
    async fn attempt_connect(&mut self) {
        if !self.state.session.provider_present() {
            self.state.connect.message =
                Some("Installa un wallet per usare lo sportello.".to_string());
            return;
        }

        match self.provider.request_accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(account) => {
                    if let Err(err) = self.adopt_account(account).await {
                        self.state.connect.message = Some(format!("Sessione non valida: {err}"));
                    }
                }
                None => {
                    self.state.connect.message = Some("Nessun account autorizzato.".to_string());
                }
            },
            Err(err) => {
                self.state.connect.message = Some(message_for_error(&err));
            }
        }
    }

    /// Authorizes `account`, binds the contract and issues the initial
    /// balance fetch as an explicit command, not a render side effect.
    async fn adopt_account(&mut self, account: Address) -> Result<()> {
        self.state.session.authorize(account)?;
        self.state.session.bind_contract(self.contract_address)?;
        self.state.screen = Screen::Home;
        self.state.connect.message = None;
        self.refresh_balance().await;
        Ok(())
    }

    /// The bound contract handle, derived from the session machine.
    fn contract(&self) -> Option<Contract> {
        let account = self.state.session.account()?;
        let address = self.state.session.contract()?;
        Some(Contract::bind(account, address))
    }

    /// Explicit balance fetch; the result always overwrites the cached
    /// value. Before `ContractBound` the action is rejected, not crashed.
    async fn refresh_balance(&mut self) {
        let Some(contract) = self.contract() else {
            self.toast(ToastLevel::Error, "Nessun contratto collegato.");
            return;
        };

        match contract.balance(&self.provider).await {
            Ok(balance) => {
                self.state.balance = Some(balance);
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => self.toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    /// Deposits the configured unit amount, then refetches the balance.
    ///
    /// The fetch runs strictly after the confirmation await, so it observes
    /// the transaction's effects. On failure the balance keeps its last
    /// known value.
    async fn deposit(&mut self) {
        let Some(contract) = self.contract() else {
            self.toast(ToastLevel::Error, "Collega il wallet prima di operare.");
            return;
        };

        self.toast(ToastLevel::Info, "Deposito inviato, attendo conferma...");
        let outcome = contract
            .deposit(
                &self.provider,
                U256::from(self.config.unit_amount),
                self.receipt_poll(),
                self.config.receipt_attempts,
            )
            .await;

        match outcome {
            Ok(()) => {
                self.refresh_balance().await;
                self.toast(ToastLevel::Success, "Deposito confermato.");
            }
            Err(err) => self.toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    /// Withdraws the configured unit amount, then refetches the balance.
    async fn withdraw(&mut self) {
        let Some(contract) = self.contract() else {
            self.toast(ToastLevel::Error, "Collega il wallet prima di operare.");
            return;
        };

        self.toast(ToastLevel::Info, "Prelievo inviato, attendo conferma...");
        let outcome = contract
            .withdraw(
                &self.provider,
                U256::from(self.config.unit_amount),
                self.receipt_poll(),
                self.config.receipt_attempts,
            )
            .await;

        match outcome {
            Ok(()) => {
                self.refresh_balance().await;
                self.toast(ToastLevel::Success, "Prelievo confermato.");
            }
            Err(err) => self.toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    /// Appends a ledger entry from the form; clears the inputs on success.
    fn submit_entry(&mut self) {
        let amount = match self.state.form.amount.parse::<MoneyCents>() {
            Ok(amount) => amount,
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Importo non valido: {err}"));
                return;
            }
        };
        let description = self.state.form.description.trim().to_string();
        let kind = self.state.form.kind;

        self.state.ledger.add(amount, description, kind);
        self.state.form.clear();
        self.state.mode = HomeMode::View;
        self.state.list_kind = kind;
        self.state.selected = self.state.ledger.len(kind).saturating_sub(1);
    }

    /// Removes the selected entry through its stable id.
    fn remove_selected(&mut self) {
        let kind = self.state.list_kind;
        let Some(entry) = self.state.ledger.entries(kind).get(self.state.selected) else {
            return;
        };

        let id = entry.id;
        if let Err(err) = self.state.ledger.remove(id, kind) {
            self.toast(ToastLevel::Error, format!("Rimozione fallita: {err}"));
            return;
        }

        let len = self.state.ledger.len(kind);
        if self.state.selected >= len {
            self.state.selected = len.saturating_sub(1);
        }
    }

    fn select_prev(&mut self) {
        self.state.selected = self.state.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        let len = self.state.ledger.len(self.state.list_kind);
        if len == 0 {
            return;
        }
        self.state.selected = (self.state.selected + 1).min(len - 1);
    }

    fn receipt_poll(&self) -> Duration {
        Duration::from_millis(self.config.receipt_poll_ms)
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = &self.state.toast {
            if toast.shown_at.elapsed() > TOAST_TTL {
                self.state.toast = None;
            }
        }
    }
}

fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Rejected => "Richiesta rifiutata dal wallet.".to_string(),
        ClientError::Unauthorized => "Account non autorizzato dal wallet.".to_string(),
        ClientError::UnsupportedMethod => "Metodo non supportato dal wallet.".to_string(),
        ClientError::Disconnected => "Wallet scollegato dalla rete.".to_string(),
        ClientError::Reverted => "Transazione annullata dal contratto.".to_string(),
        ClientError::Timeout => "Conferma non arrivata in tempo.".to_string(),
        ClientError::Rpc { code, message } => format!("Errore RPC {code}: {message}"),
        ClientError::Transport(err) => format!("Wallet non raggiungibile: {err}"),
        ClientError::Decode(message) => format!("Risposta non valida: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn submit_entry_appends_and_clears_the_form() {
        let mut app = app();
        app.state.form.amount = "50".to_string();
        app.state.form.description = "salary".to_string();
        app.state.form.kind = EntryKind::Income;
        app.state.mode = HomeMode::AddEntry;

        app.submit_entry();

        let incomes = app.state.ledger.entries(EntryKind::Income);
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].amount, MoneyCents::new(5000));
        assert_eq!(incomes[0].description, "salary");
        assert!(app.state.form.amount.is_empty());
        assert!(app.state.form.description.is_empty());
        assert_eq!(app.state.mode, HomeMode::View);
    }

    #[test]
    fn submit_entry_keeps_the_form_on_bad_amount() {
        let mut app = app();
        app.state.form.amount = "not a number".to_string();
        app.state.mode = HomeMode::AddEntry;

        app.submit_entry();

        assert!(app.state.ledger.is_empty());
        assert_eq!(app.state.form.amount, "not a number");
        assert!(matches!(
            app.state.toast,
            Some(ToastState {
                level: ToastLevel::Error,
                ..
            })
        ));
    }

    #[test]
    fn remove_selected_deletes_exactly_one_entry() {
        let mut app = app();
        app.state
            .ledger
            .add(MoneyCents::new(100), "a", EntryKind::Expense);
        app.state
            .ledger
            .add(MoneyCents::new(200), "b", EntryKind::Expense);
        app.state.list_kind = EntryKind::Expense;
        app.state.selected = 0;

        app.remove_selected();

        let rest = app.state.ledger.entries(EntryKind::Expense);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].description, "b");
        assert_eq!(app.state.selected, 0);
    }

    #[test]
    fn remove_selected_on_empty_list_is_a_no_op() {
        let mut app = app();
        app.remove_selected();
        assert!(app.state.ledger.is_empty());
        assert!(app.state.toast.is_none());
    }

    #[tokio::test]
    async fn connect_without_provider_reports_install_message() {
        let mut app = app();
        // Session never saw a provider: the handler must report the
        // blocking condition without touching the network.
        app.attempt_connect().await;

        assert_eq!(
            app.state.connect.message.as_deref(),
            Some("Installa un wallet per usare lo sportello.")
        );
        assert!(!app.state.session.provider_present());
        assert_eq!(app.state.screen, Screen::Connect);
    }

    #[tokio::test]
    async fn refresh_before_binding_is_rejected_not_crashed() {
        let mut app = app();
        app.refresh_balance().await;

        assert_eq!(app.state.balance, None);
        assert!(matches!(
            app.state.toast,
            Some(ToastState {
                level: ToastLevel::Error,
                ..
            })
        ));
    }
}
