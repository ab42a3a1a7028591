use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use ratatui::style::Color;

/// Store file used when neither the CLI, the environment nor the config file
/// names one.
pub const DEFAULT_STORE_FILE: &str = "savedpresets.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub cursor_on: Color,       // cursor over a set cell
    pub cursor_off: Color,      // cursor over an unset cell
    pub cell_on: Color,
    pub border: Color,
    pub status_text: Color,
    pub help_hint: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            cursor_on: Color::Magenta,
            cursor_off: Color::Red,
            cell_on: Color::White,
            border: Color::Cyan,
            status_text: Color::White,
            help_hint: Color::Gray,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyphs {
    pub on: String,
    pub off: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            on: "██".to_string(),
            off: "  ".to_string(),
        }
    }
}

impl Glyphs {
    /// Terminal columns one cell occupies.
    pub fn cell_width(&self) -> usize {
        self.on.chars().count().max(self.off.chars().count()).max(1)
    }

    /// Both glyphs right-padded with spaces to [`Glyphs::cell_width`].
    pub fn padded(&self) -> (String, String) {
        let width = self.cell_width();
        (format!("{:<width$}", self.on), format!("{:<width$}", self.off))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub colors: Colors,
    pub glyphs: Glyphs,
    pub store_path: Option<PathBuf>,
}

impl Config {
    /// Load `bitpaint.toml` from the XDG config home, or the file named by
    /// `BITPAINT_CONFIG`. A missing file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("reading config from {}", path.display());
                parse_config(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Resolve the store path: CLI flag, then `BITPAINT_STORE`, then the
    /// config file, then [`DEFAULT_STORE_FILE`].
    pub fn store_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| env::var_os("BITPAINT_STORE").map(PathBuf::from))
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BITPAINT_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // Linux: $XDG_CONFIG_HOME or ~/.config
    // macOS: ~/Library/Application Support
    // Windows: %APPDATA%
    let mut path = dirs::config_dir()?;
    path.push("bitpaint.toml");
    Some(path)
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
    } else {
        // Named colors matching ratatui::style::Color variants
        let name = s.to_ascii_lowercase();
        return Some(match name.as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "dark_grey" | "darkgrey" | "dark_gray" => Color::DarkGray,
            "lightred" | "light_red" => Color::LightRed,
            "lightgreen" | "light_green" => Color::LightGreen,
            "lightblue" | "light_blue" => Color::LightBlue,
            "lightmagenta" | "light_magenta" => Color::LightMagenta,
            "lightcyan" | "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => return None,
        });
    }
    None
}

/// Parse the small TOML subset the config uses: `[section]` headers and
/// `key = value` pairs with optionally quoted values.
pub fn parse_config(content: &str) -> Config {
    let mut section = String::new();
    let mut map: HashMap<(String, String), String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len()-1].trim().to_string();
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = strip_comment(line[eq+1..].trim());
            // Accept quoted or unquoted
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len()-1].to_string()
            } else { val_raw.to_string() };
            map.insert((section.clone(), key), val);
        }
    }

    let mut cfg = Config::default();
    let get = |section: &str, key: &str| map.get(&(section.to_string(), key.to_string()));

    macro_rules! set_color {
        ($field:ident) => {
            if let Some(v) = get("colors", stringify!($field)).and_then(|s| parse_color(s)) {
                cfg.colors.$field = v;
            }
        };
    }

    set_color!(cursor_on);
    set_color!(cursor_off);
    set_color!(cell_on);
    set_color!(border);
    set_color!(status_text);
    set_color!(help_hint);

    if let Some(on) = get("glyphs", "on").filter(|s| !s.is_empty()) {
        cfg.glyphs.on = on.clone();
    }
    if let Some(off) = get("glyphs", "off").filter(|s| !s.is_empty()) {
        cfg.glyphs.off = off.clone();
    }
    if let Some(path) = get("store", "path").filter(|s| !s.is_empty()) {
        cfg.store_path = Some(PathBuf::from(path));
    }

    cfg
}

// Drop a trailing `# comment` outside of quotes.
fn strip_comment(value: &str) -> &str {
    let mut in_quotes = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return value[..i].trim_end(),
            _ => {}
        }
    }
    value
}
