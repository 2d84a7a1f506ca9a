//! Running a mod's entry point.
//!
//! [`StaticRuntime`] calls entry points compiled into the host, keyed by mod
//! name. [`CommandRuntime`] runs the entry file with the interpreter configured
//! for its extension:
//!
//! - the mod is described to the child through `MODHOST_*` environment vars
//! - exit 0 with empty stdout → no exports
//! - exit 0 with a JSON object on stdout → that object is the mod's exports
//! - any other exit → the import fails, with stderr as the reason

use std::{
    collections::HashMap,
    fmt,
    process::{Command, Stdio},
    sync::Arc,
};

use {
    anyhow::{Context, bail},
    serde_json::Value,
    tracing::debug,
};

use crate::{
    context::ModContext, descriptor::ModDescriptor, error::Error, registry::ModExports,
};

/// Executes a mod's entry point. Called at most once per module path.
pub trait ModRuntime {
    fn execute(&self, descriptor: &ModDescriptor, cx: &ModContext<'_>)
    -> anyhow::Result<ModExports>;
}

/// An entry point compiled into the host.
pub trait ModEntry: Send + Sync {
    fn init(&self, cx: &ModContext<'_>) -> anyhow::Result<ModExports>;
}

struct FnEntry<F>(F);

impl<F> ModEntry for FnEntry<F>
where
    F: Fn(&ModContext<'_>) -> anyhow::Result<ModExports> + Send + Sync,
{
    fn init(&self, cx: &ModContext<'_>) -> anyhow::Result<ModExports> {
        (self.0)(cx)
    }
}

/// Entry points registered in-process by mod name.
#[derive(Default, Clone)]
pub struct StaticRuntime {
    entries: HashMap<String, Arc<dyn ModEntry>>,
}

impl StaticRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, entry: impl ModEntry + 'static) {
        self.entries.insert(name.into(), Arc::new(entry));
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&ModContext<'_>) -> anyhow::Result<ModExports> + Send + Sync + 'static,
    {
        self.register(name, FnEntry(f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl ModRuntime for StaticRuntime {
    fn execute(
        &self,
        descriptor: &ModDescriptor,
        cx: &ModContext<'_>,
    ) -> anyhow::Result<ModExports> {
        let entry = self
            .entries
            .get(descriptor.name())
            .with_context(|| format!("no entry point registered for mod '{}'", descriptor.name()))?;
        entry.init(cx)
    }
}

impl fmt::Debug for StaticRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("StaticRuntime")
            .field("entries", &names)
            .finish()
    }
}

/// Runs entry files as child processes.
#[derive(Debug, Clone)]
pub struct CommandRuntime {
    extension: String,
    interpreters: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl CommandRuntime {
    pub fn new(extension: impl Into<String>, interpreters: HashMap<String, String>) -> Self {
        Self {
            extension: extension.into(),
            interpreters,
            env: HashMap::new(),
        }
    }

    /// Extra environment passed to every entry file.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn interpreter(&self) -> Result<&str, Error> {
        self.interpreters
            .get(&self.extension)
            .map(String::as_str)
            .ok_or_else(|| Error::NoInterpreter {
                extension: self.extension.clone(),
            })
    }
}

impl ModRuntime for CommandRuntime {
    fn execute(
        &self,
        descriptor: &ModDescriptor,
        cx: &ModContext<'_>,
    ) -> anyhow::Result<ModExports> {
        let interpreter = self.interpreter()?;
        let entry_file = descriptor.entry_file(&self.extension);
        let host = cx.host();

        debug!(
            mod_name = descriptor.name(),
            interpreter,
            entry = %entry_file.display(),
            "running mod entry file"
        );

        let output = Command::new(interpreter)
            .arg(&entry_file)
            .envs(&self.env)
            .env("MODHOST_HOST", host.name())
            .env("MODHOST_MOD_NAME", descriptor.name())
            .env("MODHOST_MOD_PATH", descriptor.path())
            .env("MODHOST_MODULE_PATH", descriptor.module_path())
            .env("MODHOST_PATH", cx.search_path().to_env_value()?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| {
                format!("failed to run {interpreter} {}", entry_file.display())
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let reason = match stderr.trim() {
                "" => format!("entry file exited with {}", output.status),
                trimmed => trimmed.to_string(),
            };
            bail!(reason);
        }

        if !stderr.trim().is_empty() {
            debug!(mod_name = descriptor.name(), stderr = %stderr.trim(), "mod wrote to stderr");
        }

        let stdout = stdout.trim();
        if stdout.is_empty() {
            return Ok(ModExports::new());
        }

        match serde_json::from_str::<Value>(stdout).context("mod stdout is not valid JSON")? {
            Value::Object(exports) => Ok(exports),
            other => bail!("mod stdout must be a JSON object, got {other}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::{
            host::HostModule, index::ModIndex, registry::ModuleRegistry,
            search_path::ModuleSearchPath, shim::ImportResolver,
        },
    };

    struct Fixture {
        host: Arc<HostModule>,
        resolver: ImportResolver,
        registry: ModuleRegistry,
        index: ModIndex,
        search_path: ModuleSearchPath,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                host: Arc::new(HostModule::new("host", ())),
                resolver: ImportResolver::new(),
                registry: ModuleRegistry::new(),
                index: ModIndex::default(),
                search_path: ModuleSearchPath::new(),
            }
        }

        fn cx<'a>(&'a self, descriptor: &'a ModDescriptor) -> ModContext<'a> {
            ModContext::new(
                descriptor,
                &self.host,
                &self.resolver,
                &self.registry,
                &self.index,
                &self.search_path,
            )
        }
    }

    #[test]
    fn static_runtime_calls_registered_entry() {
        let mut runtime = StaticRuntime::new();
        runtime.register_fn("fireball", |cx| {
            let mut exports = ModExports::new();
            exports.insert("name".into(), Value::from(cx.descriptor().name()));
            Ok(exports)
        });

        let fixture = Fixture::new();
        let descriptor = ModDescriptor::new("fireball", "mods/fireball");
        let exports = runtime.execute(&descriptor, &fixture.cx(&descriptor)).unwrap();
        assert_eq!(exports.get("name"), Some(&Value::from("fireball")));
    }

    #[test]
    fn static_runtime_without_entry_fails() {
        let runtime = StaticRuntime::new();
        let fixture = Fixture::new();
        let descriptor = ModDescriptor::new("ghost", "mods/ghost");
        let err = runtime
            .execute(&descriptor, &fixture.cx(&descriptor))
            .unwrap_err();
        assert!(err.to_string().contains("no entry point registered"));
    }

    #[test]
    fn command_runtime_needs_an_interpreter() {
        let runtime = CommandRuntime::new("lua", HashMap::new());
        let fixture = Fixture::new();
        let descriptor = ModDescriptor::new("x", "mods/x");
        let err = runtime
            .execute(&descriptor, &fixture.cx(&descriptor))
            .unwrap_err();
        assert!(err.to_string().contains("no interpreter configured for .lua"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn sh_runtime() -> CommandRuntime {
            CommandRuntime::new("sh", HashMap::from([("sh".into(), "sh".into())]))
        }

        fn write_mod(root: &std::path::Path, name: &str, body: &str) -> ModDescriptor {
            let dir = root.join(name);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(format!("{name}.sh")), body).unwrap();
            ModDescriptor::new(name, dir)
        }

        #[test]
        fn stdout_json_object_becomes_exports() {
            let tmp = tempfile::tempdir().unwrap();
            let descriptor = write_mod(
                tmp.path(),
                "fireball",
                "printf '{\"mod\": \"%s\", \"host\": \"%s\", \"path\": \"%s\"}' \
                 \"$MODHOST_MOD_NAME\" \"$MODHOST_HOST\" \"$MODHOST_MODULE_PATH\"\n",
            );
            let fixture = Fixture::new();
            let exports = sh_runtime()
                .execute(&descriptor, &fixture.cx(&descriptor))
                .unwrap();
            assert_eq!(exports.get("mod"), Some(&Value::from("fireball")));
            assert_eq!(exports.get("host"), Some(&Value::from("host")));
            assert_eq!(exports.get("path"), Some(&Value::from("mods.fireball.fireball")));
        }

        #[test]
        fn silent_entry_has_no_exports() {
            let tmp = tempfile::tempdir().unwrap();
            let descriptor = write_mod(tmp.path(), "quiet", "echo noise >&2\n");
            let fixture = Fixture::new();
            let exports = sh_runtime()
                .execute(&descriptor, &fixture.cx(&descriptor))
                .unwrap();
            assert!(exports.is_empty());
        }

        #[test]
        fn non_zero_exit_reports_stderr() {
            let tmp = tempfile::tempdir().unwrap();
            let descriptor = write_mod(tmp.path(), "broken", "echo 'bad spell' >&2\nexit 3\n");
            let fixture = Fixture::new();
            let err = sh_runtime()
                .execute(&descriptor, &fixture.cx(&descriptor))
                .unwrap_err();
            assert_eq!(err.to_string(), "bad spell");
        }

        #[test]
        fn non_object_stdout_is_rejected() {
            let tmp = tempfile::tempdir().unwrap();
            let descriptor = write_mod(tmp.path(), "listy", "echo '[1, 2]'\n");
            let fixture = Fixture::new();
            let err = sh_runtime()
                .execute(&descriptor, &fixture.cx(&descriptor))
                .unwrap_err();
            assert!(err.to_string().contains("must be a JSON object"));
        }

        #[test]
        fn search_path_and_extra_env_reach_the_child() {
            let tmp = tempfile::tempdir().unwrap();
            let descriptor = write_mod(
                tmp.path(),
                "pathy",
                "printf '{\"path\": \"%s\", \"extra\": \"%s\"}' \"$MODHOST_PATH\" \"$EXTRA\"\n",
            );
            let mut fixture = Fixture::new();
            fixture.search_path.append("/opt/packs/packA");
            let runtime = sh_runtime().with_env("EXTRA", "yes");
            let exports = runtime.execute(&descriptor, &fixture.cx(&descriptor)).unwrap();
            assert_eq!(exports.get("path"), Some(&Value::from("/opt/packs/packA")));
            assert_eq!(exports.get("extra"), Some(&Value::from("yes")));
        }
    }
}
