// Main TUI application using ratatui
// Login screen, tabs, search box, playlist and the player panel

use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame, Terminal,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::player::native::NativeSurface;
use crate::player::process::MediaLauncher;
use crate::player::youtube::{StreamExtractor, YouTubeSurface};
use crate::player::{ControllerEvent, EndOutcome, PlaybackController, PlayerSurface, SurfaceKind};
use crate::playlist::{PlaylistItem, PlaylistSource, Tab};
use crate::session::{LoginField, LoginGate};
use crate::settings::Settings;

enum AppMode {
    LoginPrompt,
    Normal,
    Searching,
}

type PlaylistResult = Result<Vec<PlaylistItem>, String>;

pub struct VideoPlayerApp {
    controller: PlaybackController,
    settings: Settings,
    source: PlaylistSource,
    login: LoginGate,
    mode: AppMode,
    selected: usize,
    should_quit: bool,
    loading: bool,
    load_error: Option<String>,
    // Held back until the login gate is passed
    pending_playlist: Option<Vec<PlaylistItem>>,
    playlist_rx: mpsc::UnboundedReceiver<PlaylistResult>,
    playlist_tx: mpsc::UnboundedSender<PlaylistResult>,
    status_message: String,
}

impl VideoPlayerApp {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let (playlist_tx, playlist_rx) = mpsc::unbounded_channel();

        let settings = Settings::in_config_dir()?;
        let mode = settings.load_mode();
        info!(?mode, settings = %settings.path().display(), "Loaded playback mode");

        let launcher = MediaLauncher::new(config.player.clone(), config.player_args.clone());
        let extractor = StreamExtractor::new(config.yt_dlp.clone());
        let native = Box::new(NativeSurface::new(launcher.clone()));
        let make_youtube = Box::new(move || -> Box<dyn PlayerSurface> {
            Box::new(YouTubeSurface::new(launcher.clone(), extractor.clone()))
        });

        Ok(VideoPlayerApp {
            controller: PlaybackController::new(native, make_youtube, mode),
            settings,
            source: config.playlist_source(),
            login: LoginGate::new(config.credentials()),
            mode: AppMode::LoginPrompt,
            selected: 0,
            should_quit: false,
            loading: true,
            load_error: None,
            pending_playlist: None,
            playlist_rx,
            playlist_tx,
            status_message: String::new(),
        })
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.start_playlist_load();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            terminal.draw(|f| self.draw_ui(f))?;

            if let Ok(result) = self.playlist_rx.try_recv() {
                self.on_playlist_loaded(result);
            }

            if let Some(event) = self.controller.tick() {
                self.on_controller_event(event);
            }

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_input(key.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.controller.stop();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn start_playlist_load(&mut self) {
        self.loading = true;
        self.load_error = None;

        let source = self.source.clone();
        let tx = self.playlist_tx.clone();
        tokio::spawn(async move {
            let result = source.load().await.map_err(|e| {
                error!(source = %source, error = %e, "Playlist load failed");
                format!("Playlist load failed: {}", e)
            });
            let _ = tx.send(result);
        });
    }

    fn on_playlist_loaded(&mut self, result: PlaylistResult) {
        self.loading = false;
        match result {
            Ok(items) => {
                if self.login.is_passed() {
                    self.apply_playlist(items);
                } else {
                    self.pending_playlist = Some(items);
                }
            }
            Err(e) => self.load_error = Some(e),
        }
    }

    fn apply_playlist(&mut self, items: Vec<PlaylistItem>) {
        self.status_message = format!("Loaded {} items", items.len());
        self.controller.set_playlist(items);
        self.selected = 0;
    }

    fn on_controller_event(&mut self, event: ControllerEvent) {
        self.status_message = match event {
            ControllerEvent::Ended(outcome) => self.describe(&outcome),
            ControllerEvent::Failed { id, error, outcome } => {
                format!("'{}' failed ({}). {}", id, error, self.describe(&outcome))
            }
        };
    }

    fn describe(&self, outcome: &EndOutcome) -> String {
        match outcome {
            EndOutcome::Restarted(_) => "Repeating".to_string(),
            EndOutcome::Advanced(id) => {
                let title = self
                    .controller
                    .library()
                    .all()
                    .iter()
                    .find(|item| &item.id == id)
                    .map(|item| item.title.clone())
                    .unwrap_or_else(|| id.clone());
                format!("Now playing: {}", title)
            }
            EndOutcome::Stopped => "Playback finished".to_string(),
        }
    }

    fn draw_ui(&self, frame: &mut Frame) {
        if matches!(self.mode, AppMode::LoginPrompt) {
            self.draw_login_screen(frame);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
            ])
            .split(frame.size());

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);

        self.draw_player(frame, main_chunks[0]);
        self.draw_playlist(frame, main_chunks[1]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mode = self.controller.mode();
        let checkbox = |on: bool| if on { "[x]" } else { "[ ]" };

        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "[Tab]Switch tab [/]Search [j/k]Navigate [Enter]Play [r]Repeat [a]Auto-next [s]Stop [o]Open [q]Quit".to_string()
        };
        let line = Line::from(vec![
            Span::styled(
                format!("{} Repeat  {} Auto-next  ", checkbox(mode.repeat_one), checkbox(mode.auto_next)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(text),
        ]);

        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("My Video Player"));
        frame.render_widget(header, area);
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.label()).collect();
        let index = Tab::ALL
            .iter()
            .position(|tab| *tab == self.controller.tab())
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(index)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_player(&self, frame: &mut Frame, area: Rect) {
        let info = match self.controller.current() {
            Some(item) => {
                let surface = match self.controller.active_kind() {
                    Some(SurfaceKind::YouTube) => "YouTube player",
                    Some(SurfaceKind::Native) => "Native player",
                    None => "Not loaded",
                };
                let thumb = item.thumbnail().unwrap_or_else(|| "NO THUMB".to_string());
                format!(
                    "{}\n\nType: {}\nSurface: {}\nSource: {}\nThumbnail: {}",
                    item.title,
                    item.kind.label(),
                    surface,
                    item.browser_url(),
                    thumb
                )
            }
            None => "Nothing selected".to_string(),
        };

        let player = Paragraph::new(info)
            .block(Block::default().borders(Borders::ALL).title("Now Playing"));
        frame.render_widget(player, area);
    }

    fn draw_playlist(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let search_text = match self.mode {
            AppMode::Searching => format!("{}_", self.controller.query()),
            _ => self.controller.query().to_string(),
        };
        let search = Paragraph::new(search_text)
            .block(Block::default().borders(Borders::ALL).title("Search (title/tags)"));
        frame.render_widget(search, chunks[0]);

        let block = Block::default().borders(Borders::ALL).title("Playlist");

        if self.loading {
            frame.render_widget(Paragraph::new("Loading...").block(block), chunks[1]);
            return;
        }
        if let Some(error) = &self.load_error {
            let widget = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(widget, chunks[1]);
            return;
        }
        if self.controller.library().is_empty() {
            frame.render_widget(Paragraph::new("Playlist is empty").block(block), chunks[1]);
            return;
        }

        let current_id = self.controller.current().map(|item| item.id);
        let items: Vec<ListItem> = self
            .controller
            .visible()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let active = current_id.as_deref() == Some(item.id.as_str());
                let tags: Vec<String> = item.tags.iter().take(3).map(|t| format!("#{}", t)).collect();
                let content = format!(
                    "{}{} [{}] {}",
                    if active { "▶ " } else { "  " },
                    item.title,
                    item.kind.label(),
                    tags.join(" ")
                );
                let style = if i == self.selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if active {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(content).style(style)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), chunks[1]);
    }

    fn draw_login_screen(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Length(11),
                Constraint::Percentage(35),
            ])
            .split(frame.size());

        let marker = |field: LoginField| if self.login.focus == field { ">" } else { " " };
        let login_text = vec![
            "Video Player Login".to_string(),
            String::new(),
            format!("{} Username: {}", marker(LoginField::Username), self.login.username),
            format!("{} Password: {}", marker(LoginField::Password), self.login.masked_password()),
            String::new(),
            "[Tab]Switch field [Enter]Login [Esc]Quit".to_string(),
            String::new(),
            self.login.error.clone().unwrap_or_default(),
        ]
        .join("\n");

        let login_widget = Paragraph::new(login_text)
            .block(Block::default().borders(Borders::ALL).title("Login Required"))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);

        frame.render_widget(login_widget, chunks[1]);
    }

    fn handle_input(&mut self, key: KeyCode) {
        if matches!(self.mode, AppMode::Normal) {
            self.status_message.clear();
        }

        match self.mode {
            AppMode::LoginPrompt => match key {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab | KeyCode::Up | KeyCode::Down => self.login.toggle_focus(),
                KeyCode::Backspace => self.login.pop_char(),
                KeyCode::Char(c) => self.login.push_char(c),
                KeyCode::Enter => {
                    if self.login.submit() {
                        self.mode = AppMode::Normal;
                        if let Some(items) = self.pending_playlist.take() {
                            self.apply_playlist(items);
                        }
                    }
                }
                _ => {}
            },
            AppMode::Searching => match key {
                KeyCode::Char(c) => {
                    let mut query = self.controller.query().to_string();
                    query.push(c);
                    self.update_query(&query);
                }
                KeyCode::Backspace => {
                    let mut query = self.controller.query().to_string();
                    query.pop();
                    self.update_query(&query);
                }
                KeyCode::Enter => self.mode = AppMode::Normal,
                KeyCode::Esc => {
                    self.update_query("");
                    self.mode = AppMode::Normal;
                }
                _ => {}
            },
            AppMode::Normal => match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('/') => self.mode = AppMode::Searching,
                KeyCode::Tab => self.switch_tab(self.controller.tab().toggled()),
                KeyCode::Char('1') => self.switch_tab(Tab::Video),
                KeyCode::Char('2') => self.switch_tab(Tab::YouTube),
                KeyCode::Char('j') | KeyCode::Down => self.next_item(),
                KeyCode::Char('k') | KeyCode::Up => self.prev_item(),
                KeyCode::Enter => self.play_selected(),
                KeyCode::Char('r') => {
                    let mode = self.controller.toggle_repeat();
                    self.save_mode(mode);
                }
                KeyCode::Char('a') => {
                    let mode = self.controller.toggle_auto_next();
                    self.save_mode(mode);
                }
                KeyCode::Char('s') => {
                    self.controller.stop();
                    self.status_message = "Stopped".to_string();
                }
                KeyCode::Char('o') => self.open_in_browser(),
                _ => {}
            },
        }
    }

    fn update_query(&mut self, query: &str) {
        self.controller.set_query(query);
        self.selected = 0;
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.controller.switch_tab(tab);
        self.selected = 0;
    }

    fn next_item(&mut self) {
        let len = self.controller.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    fn prev_item(&mut self) {
        let len = self.controller.visible().len();
        if len > 0 {
            if self.selected == 0 {
                self.selected = len - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    fn play_selected(&mut self) {
        let visible = self.controller.visible();
        if let Some(item) = visible.get(self.selected) {
            self.status_message = format!("Now playing: {}", item.title);
            self.controller.select(&item.id);
        }
    }

    fn save_mode(&mut self, mode: crate::playlist::PlaybackMode) {
        if let Err(e) = self.settings.save_mode(mode) {
            warn!(error = %e, "Failed to save playback mode");
            self.status_message = format!("Could not save settings: {}", e);
        }
    }

    fn open_in_browser(&mut self) {
        let Some(item) = self.controller.current() else {
            return;
        };
        let url = item.browser_url();
        if let Err(e) = open::that(&url) {
            self.status_message = format!("Failed to open browser: {}. Visit: {}", e, url);
        } else {
            self.status_message = format!("Opened {}", url);
        }
    }
}
