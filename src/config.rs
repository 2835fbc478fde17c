//! Configuration types for gfwlist2dnsmasq.
//!
//! The JSON file uses camelCase keys (`sourceUrl`, `dnsPort`, ...). A user file
//! is merged over the bundled `resources/default-config.json`; a key that is
//! missing, `null`, or an empty string takes the bundled value.
//!
//! Relative resource paths (`extendsFile`, `suffixList`) are looked up next to
//! the executable first, see [`Config::resolve_resources`].

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{ListError, Result};
use crate::fetch::DEFAULT_FETCH_TIMEOUT;
use crate::render::RenderOptions;
use crate::suffix::{SuffixListLoader, DEFAULT_MAX_AGE, PUBLIC_SUFFIX_LIST_URL};
use crate::types::ListSource;

pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/gfwlist/gfwlist/master/gfwlist.txt";
pub const DEFAULT_DNS_SERVER: &str = "127.0.0.1";
pub const DEFAULT_DNS_PORT: u16 = 5353;
pub const DEFAULT_IPSET_NAME: &str = "gfwlist";
pub const DEFAULT_TARGET_FILE: &str = "dnsmasq_list.conf";
pub const DEFAULT_EXTENDS_FILE: &str = "resources/extends.txt";
pub const DEFAULT_SUFFIX_LIST: &str = "resources/public_suffix_list.dat";

/// Defaults shipped with the tool, merged under every user config
const BUNDLED_CONFIG: &str = include_str!("../resources/default-config.json");

/// Separator of user list locations in the `userList` string form
const USER_LIST_SEPARATOR: char = '|';

/// Validated run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the base64-encoded GFWList (path or URL)
    pub source_url: String,
    /// Upstream DNS server for `server=` lines
    pub dns_server: String,
    /// Upstream DNS port for `server=` lines
    pub dns_port: u16,
    /// ipset name for `ipset=` lines
    pub ipset_name: String,
    /// Output file
    pub target_file: PathBuf,
    /// Additional plain lists, processed in order
    pub user_list: Vec<String>,
    /// Shell command run after the file is written
    pub callback_command: Option<String>,
    /// Bundled extension list
    pub extends_file: String,
    /// Public suffix list file
    pub suffix_list: PathBuf,
    /// Refresh URL for the public suffix list
    pub suffix_list_url: Option<String>,
    /// Maximum age of the suffix list file before a refresh
    pub suffix_list_max_age: Duration,
    /// Timeout for each list download
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            dns_server: DEFAULT_DNS_SERVER.to_string(),
            dns_port: DEFAULT_DNS_PORT,
            ipset_name: DEFAULT_IPSET_NAME.to_string(),
            target_file: PathBuf::from(DEFAULT_TARGET_FILE),
            user_list: Vec::new(),
            callback_command: None,
            extends_file: DEFAULT_EXTENDS_FILE.to_string(),
            suffix_list: PathBuf::from(DEFAULT_SUFFIX_LIST),
            suffix_list_url: Some(PUBLIC_SUFFIX_LIST_URL.to_string()),
            suffix_list_max_age: DEFAULT_MAX_AGE,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// `userList` accepts an `a|b` string or a JSON array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserList {
    Joined(String),
    List(Vec<String>),
}

impl UserList {
    fn into_locations(self) -> Vec<String> {
        let items: Vec<String> = match self {
            UserList::Joined(s) => s.split(USER_LIST_SEPARATOR).map(str::to_string).collect(),
            UserList::List(items) => items,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// `dnsPort` accepts a number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Port {
    Number(u64),
    Text(String),
}

impl Port {
    fn resolve(self) -> Result<Option<u16>> {
        let value = match self {
            Port::Number(n) => n.to_string(),
            Port::Text(s) if s.trim().is_empty() => return Ok(None),
            Port::Text(s) => s.trim().to_string(),
        };
        value
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ListError::ConfigError(format!("Invalid dnsPort: {}", value)))
    }
}

/// Config file as written by the user, before merging with defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    source_url: Option<String>,
    dns_server: Option<String>,
    dns_port: Option<Port>,
    ipset_name: Option<String>,
    target_file: Option<String>,
    user_list: Option<UserList>,
    callback_command: Option<String>,
    extends_file: Option<String>,
    suffix_list: Option<String>,
    suffix_list_url: Option<String>,
    suffix_list_max_age: Option<u64>,
    fetch_timeout: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ConfigFile {
    /// Take every value set in `self`, the rest from `base`
    fn merge_over(self, base: ConfigFile) -> ConfigFile {
        ConfigFile {
            source_url: non_empty(self.source_url).or(base.source_url),
            dns_server: non_empty(self.dns_server).or(base.dns_server),
            dns_port: self.dns_port.or(base.dns_port),
            ipset_name: non_empty(self.ipset_name).or(base.ipset_name),
            target_file: non_empty(self.target_file).or(base.target_file),
            user_list: self.user_list.or(base.user_list),
            callback_command: non_empty(self.callback_command).or(base.callback_command),
            extends_file: non_empty(self.extends_file).or(base.extends_file),
            suffix_list: non_empty(self.suffix_list).or(base.suffix_list),
            suffix_list_url: non_empty(self.suffix_list_url).or(base.suffix_list_url),
            suffix_list_max_age: self.suffix_list_max_age.or(base.suffix_list_max_age),
            fetch_timeout: self.fetch_timeout.or(base.fetch_timeout),
        }
    }
}

/// Directory holding the running executable
pub fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// `base/location` for a relative local path, unless only the working
/// directory has it
fn resolve_resource(base: &Path, location: &str) -> Option<PathBuf> {
    let path = Path::new(location);
    if location.is_empty() || path.is_absolute() || Url::parse(location).is_ok() {
        return None;
    }
    let candidate = base.join(path);
    if candidate.exists() || !path.exists() {
        Some(candidate)
    } else {
        None
    }
}

impl Config {
    /// Load, merge with defaults, and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ListError::ConfigError(format!(
                "Unable to open config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&text)
    }

    /// Merge a JSON config document over the bundled defaults and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let bundled: ConfigFile = serde_json::from_str(BUNDLED_CONFIG)?;
        let file: ConfigFile = serde_json::from_str(text)?;
        let file = file.merge_over(bundled);
        let defaults = Config::default();

        let dns_port = match file.dns_port {
            Some(port) => port.resolve()?.unwrap_or(defaults.dns_port),
            None => defaults.dns_port,
        };

        let config = Config {
            source_url: non_empty(file.source_url).unwrap_or(defaults.source_url),
            dns_server: non_empty(file.dns_server).unwrap_or(defaults.dns_server),
            dns_port,
            ipset_name: non_empty(file.ipset_name).unwrap_or(defaults.ipset_name),
            target_file: non_empty(file.target_file)
                .map(PathBuf::from)
                .unwrap_or(defaults.target_file),
            user_list: file
                .user_list
                .map(UserList::into_locations)
                .unwrap_or_default(),
            callback_command: non_empty(file.callback_command),
            extends_file: non_empty(file.extends_file).unwrap_or(defaults.extends_file),
            suffix_list: non_empty(file.suffix_list)
                .map(PathBuf::from)
                .unwrap_or(defaults.suffix_list),
            suffix_list_url: non_empty(file.suffix_list_url).or(defaults.suffix_list_url),
            suffix_list_max_age: file
                .suffix_list_max_age
                .map(Duration::from_secs)
                .unwrap_or(defaults.suffix_list_max_age),
            fetch_timeout: file
                .fetch_timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a usable dnsmasq file.
    pub fn validate(&self) -> Result<()> {
        if self.dns_server.trim().is_empty() {
            return Err(ListError::ConfigError("dnsServer must not be empty".into()));
        }
        if self.dns_port == 0 {
            return Err(ListError::ConfigError("dnsPort must not be 0".into()));
        }
        if self.ipset_name.trim().is_empty() {
            return Err(ListError::ConfigError("ipsetName must not be empty".into()));
        }
        if self.target_file.as_os_str().is_empty() {
            return Err(ListError::ConfigError("targetFile must not be empty".into()));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ListError::ConfigError("fetchTimeout must not be 0".into()));
        }
        Ok(())
    }

    /// Point relative `extendsFile` and `suffixList` paths into `base`.
    ///
    /// A path is left as is when it only exists relative to the working
    /// directory. URLs and absolute paths are never touched.
    pub fn resolve_resources(&mut self, base: &Path) {
        if let Some(path) = resolve_resource(base, &self.extends_file) {
            self.extends_file = path.to_string_lossy().into_owned();
        }
        if let Some(path) = self
            .suffix_list
            .to_str()
            .and_then(|location| resolve_resource(base, location))
        {
            self.suffix_list = path;
        }
    }

    /// Sources in processing order: GFWList, extension list, user lists
    pub fn sources(&self) -> Vec<ListSource> {
        let mut sources = vec![
            ListSource::primary(&self.source_url),
            ListSource::extension(&self.extends_file),
        ];
        sources.extend(self.user_list.iter().map(ListSource::user));
        sources
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            dns_server: self.dns_server.clone(),
            dns_port: self.dns_port,
            ipset_name: self.ipset_name.clone(),
        }
    }

    pub fn suffix_loader(&self) -> SuffixListLoader {
        let loader = SuffixListLoader::new(&self.suffix_list)
            .with_max_age(self.suffix_list_max_age)
            .with_timeout(self.fetch_timeout);
        match self.suffix_list_url {
            Some(ref url) => loader.with_url(url.clone()),
            None => loader,
        }
    }
}
