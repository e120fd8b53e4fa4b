use std::sync::mpsc;
use std::time::Duration;

use eframe::egui;
use egui::{Align, Align2, Color32, Layout, RichText, Ui};

use crate::api::{
    ApiClient, ApiEvent, CreateAccountOutcome, CreateProfileOutcome, FetchAccountOutcome,
    LogInOutcome, ProfileDetail,
};
use crate::canvas::RasterView;
use crate::components::editor::AvatarEditor;
use crate::raster::{DOCTRINE_PALETTE, Palette, Raster};
use crate::session::Session;
use crate::settings::Settings;
use crate::{log_err, log_info, log_warn};

/// Inline error colour — the palette's red.
const ERROR_RED: Color32 = Color32::from_rgb(0xe8, 0x00, 0x00);
/// Avatar cell size on profile cards.
const CARD_CELL_PX: f32 = 6.0;
/// Message for faults the user can't act on.
const GENERIC_ERROR: &str = "An error has occurred";

// ============================================================================
// SCREENS & PER-SCREEN STATE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    LogIn,
    CreateAccount,
    Dashboard,
}

/// Login form state. Error flags and the message are transient: they reset at
/// the start of every submission attempt.
#[derive(Default)]
pub struct LogInForm {
    pub email: String,
    pub password: String,
    pub email_error: bool,
    pub password_error: bool,
    pub error: Option<String>,
    pub busy: bool,
}

impl LogInForm {
    fn reset_errors(&mut self) {
        self.email_error = false;
        self.password_error = false;
        self.error = None;
    }
}

#[derive(Default)]
pub struct CreateAccountForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub email_error: bool,
    pub password_error: bool,
    pub confirm_error: bool,
    pub error: Option<String>,
    pub busy: bool,
    /// The account exists; the form shows the continue step instead.
    pub created: bool,
    pub continue_busy: bool,
}

impl CreateAccountForm {
    fn reset_errors(&mut self) {
        self.email_error = false;
        self.password_error = false;
        self.confirm_error = false;
        self.error = None;
    }
}

/// Account header info, already formatted for display.
pub struct AccountSummary {
    pub email: String,
    pub created_on: String,
    pub is_developer: bool,
}

/// One dashboard card. The rendering object for the avatar is owned here, in
/// the controller's card list, keyed by position in that list.
pub struct ProfileCard {
    pub name: String,
    pub balance: f64,
    avatar: Option<RasterView>,
}

impl ProfileCard {
    fn from_profile(profile: &ProfileDetail) -> Self {
        let mut raster = Raster::avatar();
        let avatar = match raster.decode_base64(&profile.picture) {
            Ok(()) => Some(RasterView::new(raster, CARD_CELL_PX)),
            Err(e) => {
                log_warn!("avatar for profile '{}' is malformed: {e}", profile.name);
                None
            }
        };
        Self {
            name: profile.name.clone(),
            balance: profile.entity.wallet.value,
            avatar,
        }
    }

    fn show(&self, ui: &mut Ui, palette: &Palette) {
        ui.group(|ui| {
            ui.set_width(120.0);
            ui.vertical_centered(|ui| {
                match &self.avatar {
                    Some(view) => {
                        view.show(ui, palette);
                    }
                    None => {
                        ui.add_space(32.0);
                        ui.weak("(no avatar)");
                        ui.add_space(32.0);
                    }
                }
                ui.add_space(4.0);
                ui.strong(&self.name);
                ui.label(format!("${:.2}", self.balance));
            });
        });
    }
}

#[derive(Default)]
pub struct CreateProfileModal {
    pub open: bool,
    pub name: String,
    pub name_error: bool,
    pub error: Option<String>,
    pub busy: bool,
    pub editor: AvatarEditor,
}

impl CreateProfileModal {
    fn reset_errors(&mut self) {
        self.name_error = false;
        self.error = None;
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct DoctrineApp {
    screen: Screen,
    palette: Palette,
    session: Session,
    api: ApiClient,
    events: mpsc::Receiver<ApiEvent>,
    /// Exchanges dispatched but not yet delivered; keeps repaints coming so
    /// the channel gets drained without user input.
    pending_requests: usize,

    login: LogInForm,
    signup: CreateAccountForm,

    account: Option<AccountSummary>,
    cards: Vec<ProfileCard>,
    account_requested: bool,
    modal: CreateProfileModal,
}

impl DoctrineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self::with_config(Settings::load(), Session::load_default())
    }

    /// Construct without an egui context, from explicit configuration. This
    /// is the constructor integration tests drive.
    pub fn with_config(settings: Settings, session: Session) -> Self {
        let (sender, events) = mpsc::channel();
        let mut api = ApiClient::new(settings.server_url, sender);
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
        }
        let screen = if session.is_logged_in() {
            Screen::Dashboard
        } else {
            Screen::LogIn
        };

        Self {
            screen,
            palette: DOCTRINE_PALETTE,
            session,
            api,
            events,
            pending_requests: 0,
            login: LogInForm::default(),
            signup: CreateAccountForm::default(),
            account: None,
            cards: Vec::new(),
            account_requested: false,
            modal: CreateProfileModal::default(),
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login(&self) -> &LogInForm {
        &self.login
    }

    pub fn login_mut(&mut self) -> &mut LogInForm {
        &mut self.login
    }

    pub fn signup(&self) -> &CreateAccountForm {
        &self.signup
    }

    pub fn signup_mut(&mut self) -> &mut CreateAccountForm {
        &mut self.signup
    }

    pub fn modal(&self) -> &CreateProfileModal {
        &self.modal
    }

    pub fn account(&self) -> Option<&AccountSummary> {
        self.account.as_ref()
    }

    pub fn cards(&self) -> &[ProfileCard] {
        &self.cards
    }

    pub fn has_pending_requests(&self) -> bool {
        self.pending_requests > 0
    }

    // -- navigation ----------------------------------------------------------

    pub fn open_log_in(&mut self) {
        self.login = LogInForm::default();
        self.screen = Screen::LogIn;
    }

    pub fn open_create_account(&mut self) {
        self.signup = CreateAccountForm::default();
        self.screen = Screen::CreateAccount;
    }

    fn enter_dashboard(&mut self) {
        self.account = None;
        self.cards.clear();
        self.account_requested = false;
        self.modal = CreateProfileModal::default();
        self.login = LogInForm::default();
        self.signup = CreateAccountForm::default();
        self.screen = Screen::Dashboard;
    }

    /// Clear the persisted session and return to the login screen,
    /// optionally with an explanation on the login form.
    pub fn log_out(&mut self, message: Option<&str>) {
        self.session.clear();
        self.api.clear_token();
        self.account = None;
        self.cards.clear();
        self.account_requested = false;
        self.modal = CreateProfileModal::default();
        self.login = LogInForm::default();
        self.login.error = message.map(str::to_string);
        self.screen = Screen::LogIn;
    }

    // -- submissions ---------------------------------------------------------

    pub fn submit_log_in(&mut self) {
        self.login.reset_errors();
        let email = self.login.email.trim().to_string();
        if email.is_empty() || self.login.password.is_empty() {
            self.login.email_error = email.is_empty();
            self.login.password_error = self.login.password.is_empty();
            self.login.error = Some("Enter an email address and password".to_string());
            return;
        }
        self.login.busy = true;
        self.pending_requests += 1;
        self.api.log_in(&email, &self.login.password);
    }

    pub fn submit_create_account(&mut self) {
        self.signup.reset_errors();
        let email = self.signup.email.trim().to_string();
        if email.is_empty() || self.signup.password.is_empty() {
            self.signup.email_error = email.is_empty();
            self.signup.password_error = self.signup.password.is_empty();
            self.signup.error = Some("Enter an email address and password".to_string());
            return;
        }
        if self.signup.confirm != self.signup.password {
            self.signup.confirm_error = true;
            self.signup.error = Some("Passwords do not match".to_string());
            return;
        }
        self.signup.busy = true;
        self.pending_requests += 1;
        self.api.create_account(&email, &self.signup.password);
    }

    /// Continue step after account creation: log in with the credentials the
    /// user just registered.
    pub fn submit_continue(&mut self) {
        self.signup.continue_busy = true;
        self.pending_requests += 1;
        self.api
            .log_in(self.signup.email.trim(), &self.signup.password);
    }

    pub fn open_create_profile_modal(&mut self) {
        self.modal = CreateProfileModal::default();
        self.modal.open = true;
        // The canvas starts blank; a freshly generated avatar replaces it
        // when the exchange completes.
        self.pending_requests += 1;
        self.api.generate_avatar();
    }

    pub fn close_create_profile_modal(&mut self) {
        self.modal = CreateProfileModal::default();
    }

    pub fn submit_create_profile(&mut self) {
        self.modal.reset_errors();
        let name = self.modal.name.trim().to_string();
        if name.is_empty() {
            self.modal.name_error = true;
            self.modal.error = Some("Enter a profile name".to_string());
            return;
        }
        let Some(account_id) = self.session.account_id() else {
            self.modal.error = Some(GENERIC_ERROR.to_string());
            return;
        };
        self.modal.busy = true;
        self.pending_requests += 1;
        self.api
            .create_profile(account_id, &name, &self.modal.editor.encoded());
    }

    // -- api events ----------------------------------------------------------

    /// Drain every delivered event. Called once per frame, and by tests in
    /// place of the frame loop.
    pub fn pump_api_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_api_event(event);
        }
    }

    pub fn apply_api_event(&mut self, event: ApiEvent) {
        self.pending_requests = self.pending_requests.saturating_sub(1);
        match event {
            ApiEvent::AccountCreated(result) => {
                self.signup.busy = false;
                match result {
                    Ok(CreateAccountOutcome::Created) => {
                        log_info!("account created for {}", self.signup.email.trim());
                        self.signup.created = true;
                    }
                    Ok(CreateAccountOutcome::EmailInUse) => {
                        self.signup.email_error = true;
                        self.signup.error = Some("Email address already in use".to_string());
                    }
                    Ok(CreateAccountOutcome::ServerFault) => {
                        self.signup.error = Some(GENERIC_ERROR.to_string());
                    }
                    Err(e) => {
                        log_err!("account creation request failed: {e}");
                        self.signup.error = Some(GENERIC_ERROR.to_string());
                    }
                }
            }

            ApiEvent::LoggedIn(result) => {
                self.login.busy = false;
                self.signup.continue_busy = false;
                match result {
                    Ok(LogInOutcome::LoggedIn { token, account_id }) => {
                        self.session.store(token.clone(), account_id);
                        self.api.set_token(token);
                        log_info!("logged in as account {account_id}");
                        self.enter_dashboard();
                    }
                    Ok(LogInOutcome::InvalidCredentials) => {
                        self.login.email_error = true;
                        self.login.password_error = true;
                        self.report_auth_error("Invalid credentials");
                    }
                    Ok(LogInOutcome::ServerFault) => {
                        self.report_auth_error(GENERIC_ERROR);
                    }
                    Err(e) => {
                        log_err!("log in request failed: {e}");
                        self.report_auth_error(GENERIC_ERROR);
                    }
                }
            }

            ApiEvent::AccountFetched(result) => match result {
                Ok(FetchAccountOutcome::Fetched(detail)) => {
                    self.account = Some(AccountSummary {
                        email: detail.email_address.clone(),
                        created_on: format_creation_date(&detail.creation_time),
                        is_developer: detail.is_developer,
                    });
                    self.cards = detail.profiles.iter().map(ProfileCard::from_profile).collect();
                }
                Ok(FetchAccountOutcome::SessionInvalid) => {
                    log_warn!("stored session rejected by the server; logging out");
                    self.log_out(Some("Session expired, please log in again."));
                }
                Err(e) => {
                    log_err!("account fetch failed: {e}");
                    self.log_out(Some("Session expired, please log in again."));
                }
            },

            ApiEvent::ProfileCreated(result) => {
                self.modal.busy = false;
                match result {
                    Ok(CreateProfileOutcome::Created(profile)) => {
                        log_info!("profile '{}' created", profile.name);
                        self.cards.push(ProfileCard::from_profile(&profile));
                        self.close_create_profile_modal();
                    }
                    Ok(CreateProfileOutcome::NameTaken) => {
                        self.modal.name_error = true;
                        self.modal.error = Some("Profile name already taken".to_string());
                    }
                    Ok(CreateProfileOutcome::ServerFault) => {
                        self.modal.error = Some(GENERIC_ERROR.to_string());
                    }
                    Err(e) => {
                        log_err!("profile creation request failed: {e}");
                        self.modal.error = Some(GENERIC_ERROR.to_string());
                    }
                }
            }

            ApiEvent::AvatarGenerated(result) => match result {
                Ok(image) => {
                    if self.modal.open {
                        if let Err(e) = self.modal.editor.load_base64(&image) {
                            log_warn!("generated avatar was malformed: {e}");
                        }
                    }
                }
                Err(e) => {
                    // The editor keeps its blank canvas; painting still works.
                    log_err!("avatar generation failed: {e}");
                }
            },
        }
    }

    /// Put an auth failure message on whichever form the user is looking at
    /// (login screen, or the continue step of account creation).
    fn report_auth_error(&mut self, message: &str) {
        if self.screen == Screen::CreateAccount {
            self.signup.error = Some(message.to_string());
        } else {
            self.login.error = Some(message.to_string());
        }
    }

    // -- rendering -----------------------------------------------------------

    fn show_log_in(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(64.0);
                ui.heading(RichText::new("Doctrine").size(32.0));
                ui.add_space(24.0);
                egui::Frame::group(ui.style()).inner_margin(16.0).show(ui, |ui| {
                    ui.set_width(280.0);
                    self.show_log_in_card(ui);
                });
            });
        });
    }

    fn show_log_in_card(&mut self, ui: &mut Ui) {
        ui.label("Email address");
        credential_field(ui, &mut self.login.email, self.login.email_error, false);
        ui.add_space(6.0);
        ui.label("Password");
        let submitted =
            credential_field(ui, &mut self.login.password, self.login.password_error, true);

        if let Some(message) = &self.login.error {
            ui.add_space(6.0);
            ui.colored_label(ERROR_RED, message);
        }

        ui.add_space(10.0);
        if self.login.busy {
            ui.add(egui::Spinner::new());
        } else if ui.button("Log in").clicked() || submitted {
            self.submit_log_in();
        }

        ui.add_space(8.0);
        if ui.link("Create an account").clicked() {
            self.open_create_account();
        }
    }

    fn show_create_account(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(64.0);
                ui.heading(RichText::new("Doctrine").size(32.0));
                ui.add_space(24.0);
                egui::Frame::group(ui.style()).inner_margin(16.0).show(ui, |ui| {
                    ui.set_width(280.0);
                    if self.signup.created {
                        self.show_continue_card(ui);
                    } else {
                        self.show_create_account_card(ui);
                    }
                });
            });
        });
    }

    fn show_create_account_card(&mut self, ui: &mut Ui) {
        ui.label("Email address");
        credential_field(ui, &mut self.signup.email, self.signup.email_error, false);
        ui.add_space(6.0);
        ui.label("Password");
        credential_field(ui, &mut self.signup.password, self.signup.password_error, true);
        ui.add_space(6.0);
        ui.label("Confirm password");
        let submitted =
            credential_field(ui, &mut self.signup.confirm, self.signup.confirm_error, true);

        if let Some(message) = &self.signup.error {
            ui.add_space(6.0);
            ui.colored_label(ERROR_RED, message);
        }

        ui.add_space(10.0);
        if self.signup.busy {
            ui.add(egui::Spinner::new());
        } else if ui.button("Create account").clicked() || submitted {
            self.submit_create_account();
        }

        ui.add_space(8.0);
        if ui.link("Log in instead").clicked() {
            self.open_log_in();
        }
    }

    fn show_continue_card(&mut self, ui: &mut Ui) {
        ui.label("Account created.");
        ui.add_space(6.0);
        ui.label(format!("Continue to log in as {}.", self.signup.email.trim()));

        if let Some(message) = &self.signup.error {
            ui.add_space(6.0);
            ui.colored_label(ERROR_RED, message);
        }

        ui.add_space(10.0);
        if self.signup.continue_busy {
            ui.add(egui::Spinner::new());
        } else if ui.button("Continue").clicked() {
            self.submit_continue();
        }
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        // Fetch account details on the first dashboard frame after entry.
        if !self.account_requested {
            match self.session.account_id() {
                Some(id) => {
                    self.pending_requests += 1;
                    self.api.fetch_account(id);
                    self.account_requested = true;
                }
                None => {
                    self.log_out(Some("Session expired, please log in again."));
                    return;
                }
            }
        }

        let mut log_out = false;
        let mut open_modal = false;
        let mut create = false;
        let mut cancel = false;

        egui::TopBottomPanel::top("dashboard_top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Doctrine");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Log out").clicked() {
                        log_out = true;
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.account {
            None => {
                ui.add_space(48.0);
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Loading account…");
                });
            }
            Some(account) => {
                egui::Grid::new("account_info").num_columns(2).show(ui, |ui| {
                    ui.weak("Email address");
                    ui.label(&account.email);
                    ui.end_row();
                    ui.weak("Created on");
                    ui.label(&account.created_on);
                    ui.end_row();
                    ui.weak("Developer");
                    ui.label(if account.is_developer { "yes" } else { "no" });
                    ui.end_row();
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for card in &self.cards {
                            card.show(ui, &self.palette);
                        }
                        if ui
                            .add_sized([120.0, 140.0], egui::Button::new("+ New profile"))
                            .clicked()
                        {
                            open_modal = true;
                        }
                    });
                });
            }
        });

        if self.modal.open {
            egui::Window::new("Create profile")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    self.modal.editor.show(ui, &self.palette);
                    ui.add_space(8.0);
                    ui.label("Profile name");
                    if credential_field(ui, &mut self.modal.name, self.modal.name_error, false) {
                        create = true;
                    }

                    if let Some(message) = &self.modal.error {
                        ui.add_space(6.0);
                        ui.colored_label(ERROR_RED, message);
                    }

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if self.modal.busy {
                            ui.add(egui::Spinner::new());
                        } else {
                            if ui.button("Create").clicked() {
                                create = true;
                            }
                            if ui.button("Cancel").clicked() {
                                cancel = true;
                            }
                        }
                    });
                });
        }

        if create {
            self.submit_create_profile();
        }
        if cancel {
            self.close_create_profile_modal();
        }
        if open_modal {
            self.open_create_profile_modal();
        }
        if log_out {
            self.log_out(None);
        }
    }
}

impl eframe::App for DoctrineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_api_events();

        // Worker threads can't wake the UI; keep polling while any exchange
        // is in flight.
        if self.pending_requests > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        match self.screen {
            Screen::LogIn => self.show_log_in(ctx),
            Screen::CreateAccount => self.show_create_account(ctx),
            Screen::Dashboard => self.show_dashboard(ctx),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Single-line text field; the text turns red when the field is marked
/// invalid. Returns `true` when the user pressed Enter in the field.
fn credential_field(ui: &mut Ui, value: &mut String, error: bool, password: bool) -> bool {
    let mut edit = egui::TextEdit::singleline(value)
        .desired_width(f32::INFINITY)
        .password(password);
    if error {
        edit = edit.text_color(ERROR_RED);
    }
    let response = ui.add(edit);
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a server timestamp as e.g. "12 March 2024". Accepts ISO-8601
/// (`2024-03-12T…`) and HTTP-date (`Tue, 12 Mar 2024 …`) forms; anything
/// else is shown verbatim rather than dropped.
pub fn format_creation_date(raw: &str) -> String {
    iso_date(raw)
        .or_else(|| http_date(raw))
        .unwrap_or_else(|| raw.trim().to_string())
}

fn iso_date(raw: &str) -> Option<String> {
    let date = raw.trim().split(['T', ' ']).next()?;
    let mut parts = date.splitn(3, '-');
    let year: u32 = parts.next()?.parse().ok()?;
    let month: usize = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let name = MONTHS.get(month.checked_sub(1)?)?;
    Some(format!("{day} {name} {year}"))
}

fn http_date(raw: &str) -> Option<String> {
    // "Tue, 12 Mar 2024 09:30:00 GMT"
    let mut tokens = raw.trim().split_whitespace();
    let weekday = tokens.next()?;
    if !weekday.ends_with(',') {
        return None;
    }
    let day: u32 = tokens.next()?.parse().ok()?;
    let abbr = tokens.next()?;
    let year: u32 = tokens.next()?.parse().ok()?;
    let month = MONTH_ABBREVIATIONS.iter().position(|m| *m == abbr)?;
    Some(format!("{day} {} {year}", MONTHS[month]))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiEvent, LogInOutcome};
    use std::path::PathBuf;

    fn temp_session_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("doctrine_app_test_{}_{tag}.cfg", std::process::id()))
    }

    fn test_app(tag: &str) -> (DoctrineApp, PathBuf) {
        let path = temp_session_path(tag);
        let _ = std::fs::remove_file(&path);
        let settings = Settings {
            server_url: "http://127.0.0.1:9".to_string(),
        };
        let app = DoctrineApp::with_config(settings, Session::load_from(path.clone()));
        (app, path)
    }

    #[test]
    fn formats_iso_timestamps() {
        assert_eq!(format_creation_date("2024-03-12T09:30:00"), "12 March 2024");
        assert_eq!(format_creation_date("2021-12-01"), "1 December 2021");
    }

    #[test]
    fn formats_http_dates() {
        assert_eq!(
            format_creation_date("Tue, 12 Mar 2024 09:30:00 GMT"),
            "12 March 2024"
        );
    }

    #[test]
    fn unrecognised_timestamps_pass_through() {
        assert_eq!(format_creation_date("last tuesday"), "last tuesday");
        assert_eq!(format_creation_date("2024-13-40"), "2024-13-40");
    }

    #[test]
    fn starts_on_login_without_a_session() {
        let (app, _path) = test_app("fresh");
        assert_eq!(app.screen(), Screen::LogIn);
    }

    #[test]
    fn successful_login_event_stores_session_and_navigates() {
        let (mut app, path) = test_app("login_ok");
        app.apply_api_event(ApiEvent::LoggedIn(Ok(LogInOutcome::LoggedIn {
            token: "T".to_string(),
            account_id: 42,
        })));

        assert_eq!(app.screen(), Screen::Dashboard);
        assert_eq!(app.session().token(), Some("T"));
        assert_eq!(app.session().account_id(), Some(42));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_credentials_mark_both_fields() {
        let (mut app, _path) = test_app("login_403");
        app.apply_api_event(ApiEvent::LoggedIn(Ok(LogInOutcome::InvalidCredentials)));

        assert_eq!(app.screen(), Screen::LogIn);
        assert!(app.login().email_error);
        assert!(app.login().password_error);
        assert_eq!(app.login().error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn empty_login_submission_is_rejected_locally() {
        let (mut app, _path) = test_app("login_empty");
        app.submit_log_in();
        assert!(!app.login().busy);
        assert!(app.login().email_error);
        assert!(app.login().password_error);
    }

    #[test]
    fn mismatched_confirmation_is_rejected_locally() {
        let (mut app, _path) = test_app("confirm");
        app.signup_mut().email = "a@b.c".to_string();
        app.signup_mut().password = "hunter2".to_string();
        app.signup_mut().confirm = "hunter3".to_string();
        app.submit_create_account();
        assert!(!app.signup().busy);
        assert!(app.signup().confirm_error);
        assert_eq!(app.signup().error.as_deref(), Some("Passwords do not match"));
    }
}
