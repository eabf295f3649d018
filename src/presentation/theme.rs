use colored::Colorize;

/// Colour functions for terminal output
pub struct Theme {
    pub source: fn(&str) -> String,
    pub translation: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub keyword: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "wudao" => Self::wudao(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp()
            }
        }
    }

    /// Uncoloured output, used for files and tests
    pub fn plain() -> Self {
        Self {
            source: |s| s.to_string(),
            translation: |s| s.to_string(),
            label: |s| s.to_string(),
            keyword: |s| s.to_string(),
            line: |s| s.to_string(),
            idx: |s| s.to_string(),
        }
    }

    fn temp() -> Self {
        Self {
            source: |s| s.bright_white().dimmed().italic().to_string(),
            translation: |s| s.bright_magenta().bold().to_string(),
            label: |s| s.cyan().to_string(),
            keyword: |s| s.yellow().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
        }
    }

    fn wudao() -> Self {
        Self {
            source: |s| s.bright_yellow().dimmed().italic().to_string(),
            translation: |s| s.red().bold().to_string(),
            label: |s| s.green().italic().to_string(),
            keyword: |s| s.cyan().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            source: |s| s.bright_black().italic().to_string(),
            translation: |s| s.blue().bold().to_string(),
            label: |s| s.bright_cyan().bold().to_string(),
            keyword: |s| s.magenta().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.cyan().to_string(),
        }
    }
}
