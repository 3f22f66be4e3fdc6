// Frame rendering - menu/lobby chrome and the in-round field
//
// Every frame is painted from scratch out of whatever the session holds right
// now. Nothing is interpolated: a slow network just means the same snapshot
// gets drawn again.
use glam::Vec2;
use protocol::LobbyStatus;

use crate::camera::Viewport;
use crate::game::MAX_FIELD_EXTENT;
use crate::lobby::LobbySummary;
use crate::session::Session;
use crate::view::ViewMode;

mod canvas;
mod fps;

pub use canvas::CanvasSurface;
pub use fps::FpsCounter;

const BACKGROUND: &str = "#ffffff";
const TEXT: &str = "#222222";
const MUTED: &str = "#888888";
const GRID: &str = "#eeeeee";
const BOUNDARY: &str = "#333333";
const GRID_SPACING: f32 = 100.0;
const MAX_GRID_LINES: u32 = (MAX_FIELD_EXTENT / GRID_SPACING) as u32;
const TRAIL_WIDTH: f32 = 3.0;
const HEAD_RADIUS: f32 = 5.0;
const MAX_LISTED_LOBBIES: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Minimal 2D drawing target.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: &str);
    fn line(&mut self, from: Vec2, to: Vec2, color: &str, width: f32);
    fn rect(&mut self, origin: Vec2, size: Vec2, color: &str, width: f32);
    /// Open stroked path with round caps and joins.
    fn polyline(&mut self, points: &[Vec2], color: &str, width: f32);
    fn circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn text(&mut self, text: &str, at: Vec2, size: f32, color: &str, align: TextAlign);
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Field size used until the server reports one.
    pub field: Vec2,
    pub show_grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            field: Vec2::new(protocol::DEFAULT_FIELD_WIDTH, protocol::DEFAULT_FIELD_HEIGHT),
            show_grid: true,
        }
    }
}

/// Paint one frame for the active view.
pub fn draw_frame<S: Surface + ?Sized>(surface: &mut S, session: &Session, options: &RenderOptions, fps: u32) {
    surface.clear(BACKGROUND);
    match session.view().mode() {
        ViewMode::Menu => draw_menu(surface, session),
        ViewMode::LobbyList => draw_lobby_list(surface, session),
        ViewMode::Lobby => draw_lobby(surface, session.current_lobby()),
        ViewMode::Game => draw_game(surface, session, options),
    }
    draw_hud(surface, session, fps);
}

fn draw_menu<S: Surface + ?Sized>(surface: &mut S, session: &Session) {
    let center = surface.size() * 0.5;
    surface.text("CURVE", center - Vec2::new(0.0, 60.0), 48.0, TEXT, TextAlign::Center);

    let status = if session.view().is_connected() {
        "Connected - waiting for lobbies"
    } else {
        "Disconnected - reconnecting..."
    };
    surface.text(status, center, 18.0, MUTED, TextAlign::Center);

    let name = match &session.identity().name {
        Some(name) => format!("Playing as {}", name),
        None => "Pick a name to be recognised by other players".to_string(),
    };
    surface.text(&name, center + Vec2::new(0.0, 32.0), 16.0, MUTED, TextAlign::Center);
}

fn draw_lobby_list<S: Surface + ?Sized>(surface: &mut S, session: &Session) {
    let lobbies = session.lobbies().ordered();
    let mut pen = Vec2::new(40.0, 70.0);
    surface.text("Lobbies", pen, 28.0, TEXT, TextAlign::Left);
    pen.y += 40.0;

    if lobbies.is_empty() {
        surface.text("No lobbies yet", pen, 18.0, MUTED, TextAlign::Left);
        pen.y += 28.0;
    }
    for (slot, lobby) in lobbies.iter().take(MAX_LISTED_LOBBIES).enumerate() {
        surface.text(&lobby_row(slot, lobby), pen, 18.0, TEXT, TextAlign::Left);
        pen.y += 28.0;
    }
    if lobbies.len() > MAX_LISTED_LOBBIES {
        let more = format!("... and {} more", lobbies.len() - MAX_LISTED_LOBBIES);
        surface.text(&more, pen, 16.0, MUTED, TextAlign::Left);
    }

    let footer = Vec2::new(40.0, surface.size().y - 30.0);
    surface.text("[1-9] join    [N] new lobby", footer, 16.0, MUTED, TextAlign::Left);
}

fn lobby_row(slot: usize, lobby: &LobbySummary) -> String {
    let capacity = match lobby.max_players {
        Some(max) => format!("{}/{}", lobby.players.len(), max),
        None => lobby.players.len().to_string(),
    };
    let mut row = format!(
        "{}. {}   {}   {} players",
        slot + 1,
        lobby.lobby_id,
        lobby.status.label(),
        capacity
    );
    if let Some(countdown) = lobby.countdown {
        row.push_str(&format!("   starts in {}", countdown));
    }
    row
}

fn draw_lobby<S: Surface + ?Sized>(surface: &mut S, lobby: Option<&LobbySummary>) {
    let Some(lobby) = lobby else {
        let center = surface.size() * 0.5;
        surface.text("Waiting for lobby...", center, 18.0, MUTED, TextAlign::Center);
        return;
    };

    let mut pen = Vec2::new(40.0, 70.0);
    surface.text(&format!("Lobby {}", lobby.lobby_id), pen, 28.0, TEXT, TextAlign::Left);
    pen.y += 34.0;

    let mut status = format!("Round {} - {}", lobby.round, lobby.status.label());
    if lobby.status == LobbyStatus::Countdown {
        if let Some(countdown) = lobby.countdown {
            status.push_str(&format!(" - starting in {}", countdown));
        }
    }
    surface.text(&status, pen, 18.0, MUTED, TextAlign::Left);
    pen.y += 40.0;

    for player in &lobby.players {
        surface.circle(pen + Vec2::new(6.0, 0.0), 6.0, &player.color);
        let row = format!(
            "{}   {}   {}",
            player.name,
            if player.ready { "ready" } else { "not ready" },
            player.score
        );
        surface.text(&row, pen + Vec2::new(20.0, 0.0), 18.0, TEXT, TextAlign::Left);
        pen.y += 28.0;
    }

    let summary = format!("{}/{} ready", lobby.ready_count(), lobby.players.len());
    surface.text(&summary, pen + Vec2::new(0.0, 12.0), 16.0, MUTED, TextAlign::Left);

    let footer = Vec2::new(40.0, surface.size().y - 30.0);
    surface.text("[Space] toggle ready", footer, 16.0, MUTED, TextAlign::Left);
}

fn draw_game<S: Surface + ?Sized>(surface: &mut S, session: &Session, options: &RenderOptions) {
    let snapshot = session.game();
    let field = snapshot.field_size().unwrap_or(options.field);
    let viewport = Viewport::fit(field, surface.size());

    if options.show_grid {
        for i in 1..grid_lines(field.x) {
            let x = i as f32 * GRID_SPACING;
            let from = viewport.to_screen(Vec2::new(x, 0.0));
            let to = viewport.to_screen(Vec2::new(x, field.y));
            surface.line(from, to, GRID, 0.5);
        }
        for i in 1..grid_lines(field.y) {
            let y = i as f32 * GRID_SPACING;
            let from = viewport.to_screen(Vec2::new(0.0, y));
            let to = viewport.to_screen(Vec2::new(field.x, y));
            surface.line(from, to, GRID, 0.5);
        }
    }
    surface.rect(viewport.to_screen(Vec2::ZERO), field * viewport.scale, BOUNDARY, 2.0);

    let trail_width = viewport.length(TRAIL_WIDTH).max(1.0);
    for player in snapshot.ordered_players() {
        let trail: Vec<Vec2> = player
            .curve
            .iter()
            .map(|&(x, y)| viewport.to_screen(Vec2::new(x, y)))
            .collect();
        if !trail.is_empty() {
            surface.polyline(&trail, &player.color, trail_width);
        }
        if player.alive {
            let head = viewport.to_screen(Vec2::new(player.x, player.y));
            surface.circle(head, viewport.length(HEAD_RADIUS), &player.color);
        }
    }
}

/// Number of grid cells along one side, capped so a bogus extent cannot
/// stall the frame.
fn grid_lines(extent: f32) -> u32 {
    // `as` saturates: NaN becomes 0, infinity becomes u32::MAX.
    ((extent / GRID_SPACING).ceil() as u32).min(MAX_GRID_LINES)
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, session: &Session, fps: u32) {
    surface.text(&format!("FPS {}", fps), Vec2::new(10.0, 20.0), 12.0, MUTED, TextAlign::Left);
    if session.view().mode() != ViewMode::Game {
        return;
    }
    let game = session.game();
    let round = session.current_lobby().map(|l| l.round).unwrap_or(0);
    let hud = format!("Round {}   Alive {}/{}", round, game.alive_count(), game.player_count());
    surface.text(&hud, Vec2::new(10.0, 36.0), 12.0, MUTED, TextAlign::Left);
}
