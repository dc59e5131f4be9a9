use crate::config::AppInfo;

const FALLBACK_LOCALE: &str = "en_US";

/// 組成 User-Agent 所需的執行環境資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model: String,
    pub os_name: String,
    pub os_version: String,
    pub locale: String,
}

impl DeviceInfo {
    pub fn detect(locale_override: Option<&str>) -> Self {
        let (os_name, os_version) = detect_os();
        let locale = locale_override
            .and_then(normalize_locale)
            .or_else(|| detect_locale(|key| std::env::var(key).ok()))
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());

        Self {
            model: std::env::consts::ARCH.to_string(),
            os_name,
            os_version,
            locale,
        }
    }

    /// `"{app} {version} ({build}); {device}; {os} {os_version}; {locale}"`
    pub fn user_agent(&self, app: &AppInfo) -> String {
        format!(
            "{} {} ({}); {}; {} {}; {}",
            app.name, app.version, app.build, self.model, self.os_name, self.os_version, self.locale
        )
    }
}

#[cfg(feature = "cli")]
fn detect_os() -> (String, String) {
    let name = sysinfo::System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    let version = sysinfo::System::os_version().unwrap_or_default();
    (name, version)
}

// 沒有 sysinfo 時只能取得編譯期的 OS 名稱
#[cfg(not(feature = "cli"))]
fn detect_os() -> (String, String) {
    (std::env::consts::OS.to_string(), String::new())
}

fn detect_locale<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| lookup(*key))
        .find_map(|value| normalize_locale(&value))
}

/// `en_US.UTF-8` → `en_US`；`C` / `POSIX` 視為未設定
pub fn normalize_locale(raw: &str) -> Option<String> {
    let identifier = raw
        .split(&['.', '@'][..])
        .next()
        .unwrap_or_default()
        .trim();

    match identifier {
        "" | "C" | "POSIX" => None,
        other => Some(other.to_string()),
    }
}
