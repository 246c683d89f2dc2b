//! Tests for the Lua pixel API exposed to scripts.
//!
//! Scripts run through ScriptSession against in-memory images; the
//! script files themselves live in a temp dir where a path is needed.

mod common;

use bitdither::{PixelBuffer, Rgb};
use common::{assert_binary, assert_gray, Workspace, INVERT_SCRIPT, THRESHOLD_SCRIPT};
use ditherlab::error::ScriptError;
use ditherlab::models::ScriptConfig;
use ditherlab::services::{run_script, ScriptSession, ScriptSource, SessionState};
use pretty_assertions::assert_eq;

fn run_inline(image: &mut PixelBuffer, code: &str) -> Result<(), ScriptError> {
    run_script(&ScriptConfig::default(), image, &ScriptSource::inline("test.lua", code))
}

// ============================================================================
// Capability functions
// ============================================================================

#[test]
fn test_invert_script() {
    let mut image = PixelBuffer::filled(3, 2, Rgb::new(10, 20, 30));
    run_inline(&mut image, INVERT_SCRIPT).unwrap();
    assert!(image.pixels().iter().all(|&p| p == Rgb::new(245, 235, 225)));
}

#[test]
fn test_threshold_script_from_file() {
    let ws = Workspace::new();
    let script = ws.write("threshold.lua", THRESHOLD_SCRIPT);
    let mut image = common::gradient(16, 4);

    let mut session = ScriptSession::new(&ScriptConfig::default()).unwrap();
    session.bind(&mut image).unwrap();
    session.execute_file(&script).unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    assert_binary(&image);
    assert_gray(&image);
}

#[test]
fn test_get_color_out_of_range_is_black() {
    let mut image = PixelBuffer::filled(2, 2, Rgb::gray(200));
    run_inline(
        &mut image,
        r#"
function Execute()
    for _, xy in ipairs({ {-1, -1}, {2, 0}, {0, 2}, {1e300, 0} }) do
        local c = GetColor(xy[1], xy[2])
        assert(c.r == 0 and c.g == 0 and c.b == 0, "expected black")
    end
    local inside = GetColor(1, 1)
    assert(inside.r == 200 and inside.g == 200 and inside.b == 200)
end
"#,
    )
    .unwrap();
}

#[test]
fn test_get_color_bad_argument_types_are_black() {
    let mut image = PixelBuffer::filled(1, 1, Rgb::gray(99));
    run_inline(
        &mut image,
        r#"
function Execute()
    for _, c in ipairs({ GetColor(), GetColor("x", 0), GetColor({}, 0), GetColor(0, nil) }) do
        assert(c.r == 0 and c.g == 0 and c.b == 0)
    end
end
"#,
    )
    .unwrap();
}

#[test]
fn test_coordinates_accept_floats_and_numeric_strings() {
    let mut image = PixelBuffer::new(3, 3);
    run_inline(
        &mut image,
        r#"
function Execute()
    SetColor(1.9, 2.2, { r = 10 })
    SetColor("2", "0", { g = 20 })
    local c = GetColor("1", 2.999)
    assert(c.r == 10, "got " .. tostring(c.r))
end
"#,
    )
    .unwrap();
    assert_eq!(image.get(1, 2), Some(Rgb::new(10, 0, 0)));
    assert_eq!(image.get(2, 0), Some(Rgb::new(0, 20, 0)));
}

#[test]
fn test_set_color_out_of_range_is_noop() {
    let mut image = PixelBuffer::filled(2, 2, Rgb::gray(7));
    let before = image.clone();
    run_inline(
        &mut image,
        r#"
function Execute()
    SetColor(-1, 0, { r = 255 })
    SetColor(2, 0, { r = 255 })
    SetColor(0, 2, { r = 255 })
    SetColor(0, 0)
    SetColor(0, 0, 42)
    SetColor(nil, nil, { r = 255 })
end
"#,
    )
    .unwrap();
    assert_eq!(image, before);
}

#[test]
fn test_set_color_partial_and_clamped() {
    let mut image = PixelBuffer::filled(1, 1, Rgb::new(1, 2, 3));
    run_inline(
        &mut image,
        r#"
function Execute()
    SetColor(0, 0, { g = 300 })
end
"#,
    )
    .unwrap();
    assert_eq!(image.get(0, 0), Some(Rgb::new(1, 255, 3)));

    run_inline(
        &mut image,
        r#"
function Execute()
    SetColor(0, 0, { r = -5, b = 12.7, g = "nope" })
end
"#,
    )
    .unwrap();
    assert_eq!(image.get(0, 0), Some(Rgb::new(0, 255, 12)));
}

#[test]
fn test_get_image_size() {
    let mut image = PixelBuffer::new(7, 3);
    run_inline(
        &mut image,
        r#"
function Execute()
    local s = GetImageSize()
    assert(s.w == 7 and s.h == 3)
    assert(s.width == 7 and s.height == 3)
end
"#,
    )
    .unwrap();
}

#[test]
fn test_desaturate_image() {
    let mut image = common::gradient(8, 2);
    run_inline(&mut image, "function Execute() DesaturateImage() end").unwrap();
    assert_gray(&image);
    assert_eq!(image.get(0, 0), Some(Rgb::new(0, 0, 255).desaturated()));
}

#[test]
fn test_bindings_available_while_chunk_loads() {
    // Top-level code may already use the pixel API
    let mut image = PixelBuffer::new(1, 1);
    run_inline(
        &mut image,
        r#"
SetColor(0, 0, { r = 50 })
function Execute() end
"#,
    )
    .unwrap();
    assert_eq!(image.get(0, 0), Some(Rgb::new(50, 0, 0)));
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_missing_entry_point() {
    let mut image = PixelBuffer::new(1, 1);
    let err = run_inline(&mut image, "x = 1").unwrap_err();
    assert!(matches!(err, ScriptError::MissingEntryPoint(ref name) if name == "Execute"));
    assert_eq!(err.to_string(), "Script has to define a function 'Execute'");
}

#[test]
fn test_entry_point_must_be_a_function() {
    let mut image = PixelBuffer::new(1, 1);
    let err = run_inline(&mut image, "Execute = 5").unwrap_err();
    assert!(matches!(err, ScriptError::MissingEntryPoint(_)));
}

#[test]
fn test_syntax_error_is_load_error() {
    let mut image = PixelBuffer::new(1, 1);
    let err = run_inline(&mut image, "function Execute(").unwrap_err();
    match err {
        ScriptError::Load { name, message } => {
            assert_eq!(name, "test.lua");
            assert!(message.contains("test.lua"), "message: {message}");
        }
        other => panic!("expected Load error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_load_error() {
    let ws = Workspace::new();
    let mut image = PixelBuffer::new(1, 1);
    let err = run_script(
        &ScriptConfig::default(),
        &mut image,
        &ScriptSource::file(ws.path("absent.lua")),
    )
    .unwrap_err();
    assert!(matches!(err, ScriptError::Load { .. }));
}

#[test]
fn test_runtime_error_keeps_partial_mutation() {
    let mut image = PixelBuffer::new(2, 1);
    let err = run_inline(
        &mut image,
        r#"
function Execute()
    SetColor(0, 0, { r = 255, g = 255, b = 255 })
    error("boom")
    SetColor(1, 0, { r = 255, g = 255, b = 255 })
end
"#,
    )
    .unwrap_err();

    match err {
        ScriptError::Runtime {
            entry_point,
            message,
        } => {
            assert_eq!(entry_point, "Execute");
            assert!(message.contains("boom"), "message: {message}");
        }
        other => panic!("expected Runtime error, got {other:?}"),
    }
    assert_eq!(image.get(0, 0), Some(Rgb::gray(255)));
    assert_eq!(image.get(1, 0), Some(Rgb::gray(0)));
}

#[test]
fn test_session_closed_after_failure() {
    let mut image = PixelBuffer::new(1, 1);
    let mut session = ScriptSession::new(&ScriptConfig::default()).unwrap();
    session.bind(&mut image).unwrap();
    assert!(session
        .execute(&ScriptSource::inline("bad.lua", "error('at load')"))
        .is_err());
    assert_eq!(session.state(), SessionState::Closed);
    assert!(matches!(
        session.execute(&ScriptSource::inline("ok.lua", "function Execute() end")),
        Err(ScriptError::InvalidState { .. })
    ));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_entry_point() {
    let config = ScriptConfig {
        entry_point: "Run".to_string(),
        ..Default::default()
    };
    let mut image = PixelBuffer::new(1, 1);
    run_script(
        &config,
        &mut image,
        &ScriptSource::inline("run.lua", "function Run() SetColor(0, 0, { b = 9 }) end"),
    )
    .unwrap();
    assert_eq!(image.get(0, 0), Some(Rgb::new(0, 0, 9)));

    let err = run_script(
        &config,
        &mut image,
        &ScriptSource::inline("exec.lua", "function Execute() end"),
    )
    .unwrap_err();
    assert!(matches!(err, ScriptError::MissingEntryPoint(ref name) if name == "Run"));
}

#[test]
fn test_logging_globals_toggle() {
    let mut image = PixelBuffer::new(1, 1);
    run_inline(
        &mut image,
        r#"
function Execute()
    log_info("info from script")
    log_warn("warn from script")
    log_error("error from script")
end
"#,
    )
    .unwrap();

    let config = ScriptConfig {
        allow_logging: false,
        ..Default::default()
    };
    run_script(
        &config,
        &mut image,
        &ScriptSource::inline(
            "nolog.lua",
            "function Execute() assert(log_info == nil) end",
        ),
    )
    .unwrap();
}

#[test]
fn test_memory_limit_stops_runaway_script() {
    let config = ScriptConfig {
        memory_limit_mb: Some(1),
        ..Default::default()
    };
    let mut image = PixelBuffer::new(1, 1);
    let err = run_script(
        &config,
        &mut image,
        &ScriptSource::inline(
            "hog.lua",
            r#"
function Execute()
    local t = {}
    for i = 1, 10000000 do t[i] = string.rep("x", 64) .. i end
end
"#,
        ),
    )
    .unwrap_err();
    assert!(matches!(err, ScriptError::Runtime { .. }));
}

#[test]
fn test_default_config_bounds_runaway_allocation() {
    let mut image = PixelBuffer::new(1, 1);
    let err = run_inline(
        &mut image,
        r#"
function Execute()
    local t = {}
    while true do t[#t + 1] = string.rep("x", 1 << 22) .. #t end
end
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ScriptError::Runtime { .. }), "{err}");
}
