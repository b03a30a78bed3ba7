use crate::core::config::data::{path_display, Config};

impl Config {
    /// Lines shown by `yccoach set` with no arguments.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.endpoint_url {
            Some(url) => lines.push(format!("  endpoint-url: {url}")),
            None => lines.push("  endpoint-url: (unset)".to_string()),
        }
        match self.backend {
            Some(kind) => lines.push(format!("  backend: {kind}")),
            None => lines.push(format!(
                "  backend: (auto, currently {})",
                self.effective_backend()
            )),
        }
        match &self.api_key {
            Some(_) => lines.push("  api-key: (set)".to_string()),
            None => lines.push("  api-key: (unset)".to_string()),
        }
        match &self.password_file {
            Some(path) => lines.push(format!("  password-file: {}", path_display(path))),
            None => lines.push("  password-file: (unset)".to_string()),
        }
        match &self.greeting {
            Some(greeting) => lines.push(format!("  greeting: {greeting}")),
            None => lines.push("  greeting: (default)".to_string()),
        }
        lines.push(format!(
            "  mock-latency-ms: {}",
            self.mock_latency().as_millis()
        ));
        lines
    }

    pub fn print_all(&self) {
        println!("Current configuration ({}):", path_display(Config::active_path()));
        for line in self.summary_lines() {
            println!("{line}");
        }
    }
}
