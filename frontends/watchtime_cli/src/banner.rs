use std::io::{self, Write};

use watchtime_client::BannerSurface;

/// Banner drawn as one colored line. Terminals cannot take a line back, so
/// fading out only marks the banner hidden.
pub struct TerminalBanner<W: Write + Send + 'static = io::Stderr> {
    out: W,
    line: String,
    visible: bool,
}

impl TerminalBanner<io::Stderr> {
    pub fn stderr() -> Self {
        TerminalBanner::new(io::stderr())
    }
}

impl<W: Write + Send + 'static> TerminalBanner<W> {
    pub fn new(out: W) -> Self {
        TerminalBanner {
            out,
            line: String::new(),
            visible: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> BannerSurface for TerminalBanner<W> {
    fn set_content(&mut self, message: &str, icon: &str, color: &str) {
        self.line = match hex_rgb(color) {
            Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{icon} {message}\x1b[0m"),
            None => format!("{icon} {message}"),
        };
        if self.visible {
            self.visible = false;
            self.fade_in();
        }
    }

    fn fade_in(&mut self) {
        if self.visible {
            return;
        }
        // Write errors are ignored.
        let _ = writeln!(self.out, "{}", self.line);
        let _ = self.out.flush();
        self.visible = true;
    }

    fn fade_out(&mut self) {
        self.visible = false;
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
