//! Browser entry points
//!
//! The renderer hands over a board description as JSON and gets the finished
//! drop back as JSON. Physics settings and the replay log live in LocalStorage.

use wasm_bindgen::prelude::*;

use crate::error::SimError;
use crate::replay::{ReplayEntry, ReplayLog};
use crate::settings::SimSettings;
use crate::sim::{BoardConfig, BoardGeometry, DropPosition, DropRequest, DropZone, simulate_drop};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Plinko drop simulator ready");
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn geometry_from_json(board_json: &str) -> Result<BoardGeometry, JsValue> {
    let config: BoardConfig = serde_json::from_str(board_json).map_err(js_error)?;
    BoardGeometry::new(config).map_err(|e| js_error(SimError::from(e)))
}

fn run_and_record(geometry: &BoardGeometry, request: DropRequest) -> Result<String, JsValue> {
    let settings = SimSettings::load();
    let drop = simulate_drop(geometry, &settings, &request).map_err(js_error)?;

    let mut replays = ReplayLog::load();
    replays.record(ReplayEntry::from_drop(request, &drop, js_sys::Date::now()));
    replays.save();

    serde_json::to_string(&drop).map_err(js_error)
}

/// Simulate a drop from an explicit x position
#[wasm_bindgen(js_name = simulateDrop)]
pub fn simulate_drop_json(
    board_json: &str,
    seed: u64,
    target_slot: u32,
    drop_x: f32,
) -> Result<String, JsValue> {
    let geometry = geometry_from_json(board_json)?;
    let request = DropRequest::new(seed, target_slot as usize, DropPosition::X(drop_x));
    run_and_record(&geometry, request)
}

/// Simulate a drop from a named zone ("left", "center", "right")
#[wasm_bindgen(js_name = simulateZoneDrop)]
pub fn simulate_zone_drop_json(
    board_json: &str,
    seed: u64,
    target_slot: u32,
    zone: &str,
) -> Result<String, JsValue> {
    let zone = DropZone::from_str(zone).ok_or_else(|| js_error(format!("unknown drop zone '{zone}'")))?;
    let geometry = geometry_from_json(board_json)?;
    let request = DropRequest::new(seed, target_slot as usize, DropPosition::Zone(zone));
    run_and_record(&geometry, request)
}

/// Peg layout and derived board metrics, for drawing the static board
#[wasm_bindgen(js_name = boardLayout)]
pub fn board_layout_json(board_json: &str) -> Result<String, JsValue> {
    let geometry = geometry_from_json(board_json)?;
    serde_json::to_string(&geometry).map_err(js_error)
}

/// Re-simulate a saved drop (0 = most recent)
#[wasm_bindgen(js_name = replayDrop)]
pub fn replay_drop_json(board_json: &str, index: u32) -> Result<String, JsValue> {
    let geometry = geometry_from_json(board_json)?;
    let drop = ReplayLog::load()
        .replay(index as usize, &geometry, &SimSettings::load())
        .map_err(js_error)?;
    serde_json::to_string(&drop).map_err(js_error)
}

/// Replace the stored physics settings
#[wasm_bindgen(js_name = saveSettings)]
pub fn save_settings_json(json: &str) -> Result<(), JsValue> {
    let settings = SimSettings::from_json(json).map_err(js_error)?;
    settings.save();
    Ok(())
}

#[wasm_bindgen(js_name = loadSettings)]
pub fn load_settings_json() -> Result<String, JsValue> {
    SimSettings::load().to_json().map_err(js_error)
}
