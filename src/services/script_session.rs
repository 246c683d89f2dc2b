//! Single-use Lua session bound to one image.
//!
//! A session walks `Uninitialized -> Bound -> Executing -> Closed` exactly
//! once. The pixel bindings are created inside an mlua scope, so they
//! cannot outlive the execution that created them, and the Lua state is
//! dropped as soon as the session closes.

use mlua::{Lua, LuaOptions, StdLib, Table, Value};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use bitdither::{PixelBuffer, Rgb, BLACK};

use crate::error::ScriptError;
use crate::models::ScriptConfig;

/// Lifecycle of a [`ScriptSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Bound,
    Executing,
    Closed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Bound => "bound",
            SessionState::Executing => "executing",
            SessionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    File(PathBuf),
    Inline { name: String, code: String },
}

impl ScriptSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ScriptSource::File(path.into())
    }

    pub fn inline(name: impl Into<String>, code: impl Into<String>) -> Self {
        ScriptSource::Inline {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Name used for the Lua chunk and in error messages.
    pub fn name(&self) -> String {
        match self {
            ScriptSource::File(path) => path.display().to_string(),
            ScriptSource::Inline { name, .. } => name.clone(),
        }
    }

    fn read(&self) -> Result<String, ScriptError> {
        match self {
            ScriptSource::File(path) => {
                std::fs::read_to_string(path).map_err(|e| ScriptError::Load {
                    name: self.name(),
                    message: e.to_string(),
                })
            }
            ScriptSource::Inline { code, .. } => Ok(code.clone()),
        }
    }
}

/// Binds one Lua state to one image for one script execution.
pub struct ScriptSession<'img> {
    lua: Option<Lua>,
    entry_point: String,
    image: Option<&'img mut PixelBuffer>,
    state: SessionState,
}

impl<'img> ScriptSession<'img> {
    /// Create a sandboxed Lua state.
    ///
    /// Only the coroutine, table, string, utf8 and math libraries are
    /// loaded; `dofile` and `loadfile` are removed from the base library.
    pub fn new(config: &ScriptConfig) -> Result<Self, ScriptError> {
        let lua = Lua::new_with(
            StdLib::COROUTINE | StdLib::TABLE | StdLib::STRING | StdLib::UTF8 | StdLib::MATH,
            LuaOptions::new(),
        )?;

        if let Some(limit) = config.memory_limit_bytes() {
            lua.set_memory_limit(limit)?;
        }

        let globals = lua.globals();
        globals.set("dofile", Value::Nil)?;
        globals.set("loadfile", Value::Nil)?;

        if config.allow_logging {
            register_logging(&lua)?;
        }

        Ok(Self {
            lua: Some(lua),
            entry_point: config.entry_point.clone(),
            image: None,
            state: SessionState::Uninitialized,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Attach the target image. Allowed once, before execution.
    pub fn bind(&mut self, image: &'img mut PixelBuffer) -> Result<(), ScriptError> {
        if self.state != SessionState::Uninitialized {
            return Err(self.invalid("bind"));
        }
        self.image = Some(image);
        self.state = SessionState::Bound;
        Ok(())
    }

    /// Load the script, invoke its entry function, and close the session.
    ///
    /// The session is closed whatever the outcome. Pixel writes made before
    /// a failure stay in the image.
    pub fn execute(&mut self, source: &ScriptSource) -> Result<(), ScriptError> {
        if self.state != SessionState::Bound {
            return Err(self.invalid("execute"));
        }
        self.state = SessionState::Executing;

        let result = match (self.lua.take(), self.image.take()) {
            (Some(lua), Some(image)) => {
                tracing::debug!(script = %source.name(), "Executing script");
                run(&lua, image, source, &self.entry_point)
            }
            _ => Err(ScriptError::InvalidState {
                state: SessionState::Executing.as_str(),
                action: "execute",
            }),
        };

        self.state = SessionState::Closed;
        result
    }

    pub fn execute_file(&mut self, path: &Path) -> Result<(), ScriptError> {
        self.execute(&ScriptSource::file(path))
    }

    /// Release the Lua state and the image without running anything.
    pub fn close(&mut self) {
        self.lua = None;
        self.image = None;
        self.state = SessionState::Closed;
    }

    fn invalid(&self, action: &'static str) -> ScriptError {
        ScriptError::InvalidState {
            state: self.state.as_str(),
            action,
        }
    }
}

/// Run `source` against `image` in a fresh session.
pub fn run_script(
    config: &ScriptConfig,
    image: &mut PixelBuffer,
    source: &ScriptSource,
) -> Result<(), ScriptError> {
    let mut session = ScriptSession::new(config)?;
    session.bind(image)?;
    session.execute(source)
}

fn register_logging(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();

    let log_info = lua.create_function(|_, msg: String| {
        tracing::info!(script = true, "{}", msg);
        Ok(())
    })?;
    globals.set("log_info", log_info)?;

    let log_warn = lua.create_function(|_, msg: String| {
        tracing::warn!(script = true, "{}", msg);
        Ok(())
    })?;
    globals.set("log_warn", log_warn)?;

    let log_error = lua.create_function(|_, msg: String| {
        tracing::error!(script = true, "{}", msg);
        Ok(())
    })?;
    globals.set("log_error", log_error)?;

    Ok(())
}

fn run(
    lua: &Lua,
    image: &mut PixelBuffer,
    source: &ScriptSource,
    entry_point: &str,
) -> Result<(), ScriptError> {
    let code = source.read()?;
    let image = RefCell::new(image);

    // Bindings never raise: bad input reads black or writes nothing
    let outcome = lua.scope(|scope| {
        let globals = lua.globals();

        // GetColor(x, y) -> {r, g, b}
        let get_color = scope.create_function(|lua, (x, y): (Value, Value)| {
            let color = match (coordinate(&x), coordinate(&y)) {
                (Some(x), Some(y)) => image
                    .try_borrow()
                    .map(|img| img.get_or_black(x, y))
                    .unwrap_or(BLACK),
                _ => BLACK,
            };
            color_table(lua, color)
        })?;
        globals.set("GetColor", get_color)?;

        // SetColor(x, y, {r?, g?, b?})
        let set_color = scope.create_function(|_, (x, y, color): (Value, Value, Value)| {
            let (Some(x), Some(y)) = (coordinate(&x), coordinate(&y)) else {
                return Ok(());
            };
            let Value::Table(color) = color else {
                return Ok(());
            };
            let channel = |key: &str| color.get::<Value>(key).ok().and_then(|v| coordinate(&v));
            let (r, g, b) = (channel("r"), channel("g"), channel("b"));

            if let Ok(mut img) = image.try_borrow_mut() {
                let current = usize::try_from(x)
                    .ok()
                    .zip(usize::try_from(y).ok())
                    .and_then(|(ux, uy)| img.get(ux, uy));
                if let Some(current) = current {
                    let updated = Rgb::from_clamped(
                        r.unwrap_or(current.r as i64),
                        g.unwrap_or(current.g as i64),
                        b.unwrap_or(current.b as i64),
                    );
                    img.set_checked(x, y, updated);
                }
            }
            Ok(())
        })?;
        globals.set("SetColor", set_color)?;

        // GetImageSize() -> {w, h, width, height}
        let get_image_size = scope.create_function(|lua, ()| {
            let (w, h) = image
                .try_borrow()
                .map(|img| (img.width(), img.height()))
                .unwrap_or((0, 0));
            let size = lua.create_table()?;
            size.set("w", w)?;
            size.set("h", h)?;
            size.set("width", w)?;
            size.set("height", h)?;
            Ok(size)
        })?;
        globals.set("GetImageSize", get_image_size)?;

        // DesaturateImage()
        let desaturate = scope.create_function(|_, ()| {
            if let Ok(mut img) = image.try_borrow_mut() {
                img.desaturate();
            }
            Ok(())
        })?;
        globals.set("DesaturateImage", desaturate)?;

        Ok(invoke(lua, source, &code, entry_point))
    })?;

    outcome
}

fn invoke(lua: &Lua, source: &ScriptSource, code: &str, entry_point: &str) -> Result<(), ScriptError> {
    let name = source.name();
    lua.load(code)
        .set_name(format!("@{name}"))
        .exec()
        .map_err(|e| ScriptError::Load {
            name: name.clone(),
            message: e.to_string(),
        })?;

    let Value::Function(entry) = lua.globals().get::<Value>(entry_point)? else {
        return Err(ScriptError::MissingEntryPoint(entry_point.to_string()));
    };

    entry.call::<()>(()).map_err(|e| ScriptError::Runtime {
        entry_point: entry_point.to_string(),
        message: e.to_string(),
    })
}

fn color_table(lua: &Lua, color: Rgb) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("r", color.r)?;
    table.set("g", color.g)?;
    table.set("b", color.b)?;
    Ok(table)
}

/// Interpret a Lua value as an integer the way Lua's number coercion would,
/// truncating toward zero. Non-numbers and non-finite values give `None`.
fn coordinate(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Number(n) => truncate(*n),
        Value::String(s) => s.to_str().ok().and_then(|s| parse_numeric(&s)),
        _ => None,
    }
}

fn truncate(n: f64) -> Option<i64> {
    n.is_finite().then(|| n.trunc() as i64)
}

fn parse_numeric(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let v = i64::from_str_radix(hex, 16).ok()?;
        return Some(if negative { -v } else { v });
    }
    s.parse::<f64>().ok().and_then(truncate)
}
