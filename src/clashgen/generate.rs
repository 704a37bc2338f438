use crate::catalog::ServerDescriptor;
use crate::template::ConfigTemplate;
use crate::users::UserStore;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info};

/// Everything the template sees for one user.
#[derive(Serialize)]
pub struct RenderContext<'a> {
    pub servers: &'a [ServerDescriptor],
    pub uuid: &'a str,
    pub short_id: &'a str,
    pub sni_host: &'a str,
}

/// Aggregate verdict of one batch run.
///
/// Invariant: `succeeded + failed` equals the number of valid records in the
/// store handed to [`generate`]. Records rejected at load time are not part of
/// the batch and appear in neither counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Renders and writes one config per user, in store iteration order.
///
/// Render and write failures are logged with the user's name, counted, and
/// never abort the batch. The output filename is the user's UUID, so two
/// records sharing a UUID overwrite each other and the later name in
/// iteration order wins; this mirrors upstream behavior and is a documented
/// limitation, not collision handling left to do.
pub fn generate(
    store: &UserStore,
    template: &ConfigTemplate,
    servers: &[ServerDescriptor],
    sni_host: &str,
    output_dir: &Path,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (name, record) in store {
        let ctx = RenderContext {
            servers,
            uuid: &record.uuid,
            short_id: &record.short_id,
            sni_host,
        };

        let config = match template.render(&ctx) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to render template for {}: {}", name, e);
                summary.failed += 1;
                continue;
            }
        };

        let output_path = output_dir.join(format!("{}.yaml", record.uuid));
        if let Err(e) = write_config(&output_path, &config) {
            error!("failed to write config for {}: {}", name, e);
            summary.failed += 1;
            continue;
        }

        info!("generated Clash subscription for {}", name);
        summary.succeeded += 1;
    }

    summary
}

/// Writes the rendered text verbatim and restricts the file to owner
/// read/write plus group read.
fn write_config(path: &Path, config: &str) -> io::Result<()> {
    fs::write(path, config)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o640))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_catalog;
    use crate::users::UserRecord;
    use std::fs;
    use tempfile::TempDir;

    fn template(dir: &TempDir, content: &str) -> ConfigTemplate {
        let path = dir.path().join("sub.yaml.j2");
        fs::write(&path, content).unwrap();
        ConfigTemplate::load(&path).unwrap()
    }

    fn record(uuid: &str, short_id: &str) -> UserRecord {
        UserRecord {
            uuid: uuid.to_string(),
            short_id: short_id.to_string(),
        }
    }

    #[test]
    fn test_one_file_per_user_with_rendered_content() {
        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let template = template(
            &tmpl_dir,
            "{{ uuid }}/{{ short_id }}@{{ sni_host }} via {{ servers[0].name }}",
        );
        let servers = build_catalog(&["us-1"], &[("us", "\u{1F1FA}\u{1F1F8}")]);

        let mut store = UserStore::new();
        store.insert("alice".to_string(), record("aaa", "01"));
        store.insert("bob".to_string(), record("bbb", "02"));

        let summary = generate(&store, &template, &servers, "cdn.example.com", out_dir.path());
        assert_eq!(summary, RunSummary { succeeded: 2, failed: 0 });
        assert!(summary.is_success());

        let alice = fs::read_to_string(out_dir.path().join("aaa.yaml")).unwrap();
        assert_eq!(alice, "aaa/01@cdn.example.com via \u{1F1FA}\u{1F1F8} US-1");
        let bob = fs::read_to_string(out_dir.path().join("bbb.yaml")).unwrap();
        assert_eq!(bob, "bbb/02@cdn.example.com via \u{1F1FA}\u{1F1F8} US-1");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_mode_is_0640() {
        use std::os::unix::fs::PermissionsExt;

        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let template = template(&tmpl_dir, "{{ uuid }}");
        let mut store = UserStore::new();
        store.insert("alice".to_string(), record("aaa", "01"));

        generate(&store, &template, &[], "sni", out_dir.path());

        let mode = fs::metadata(out_dir.path().join("aaa.yaml"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_render_failure_skips_user_and_continues() {
        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        // short_id "boom" has no such attribute; lenient undefined still
        // errors on attribute access of a non-object.
        let template = template(&tmpl_dir, "{% if short_id == 'boom' %}{{ nothing.attr }}{% endif %}{{ uuid }}");

        let mut store = UserStore::new();
        store.insert("bad".to_string(), record("bbb", "boom"));
        store.insert("good".to_string(), record("aaa", "01"));

        let summary = generate(&store, &template, &[], "sni", out_dir.path());
        assert_eq!(summary, RunSummary { succeeded: 1, failed: 1 });
        assert!(!summary.is_success());
        assert!(out_dir.path().join("aaa.yaml").exists());
        assert!(!out_dir.path().join("bbb.yaml").exists());
    }

    #[test]
    fn test_write_failure_counts_and_continues() {
        let tmpl_dir = TempDir::new().unwrap();
        let template = template(&tmpl_dir, "{{ uuid }}");
        let mut store = UserStore::new();
        store.insert("alice".to_string(), record("aaa", "01"));
        store.insert("bob".to_string(), record("bbb", "02"));

        let missing = tmpl_dir.path().join("no-such-dir");
        let summary = generate(&store, &template, &[], "sni", &missing);
        assert_eq!(summary, RunSummary { succeeded: 0, failed: 2 });
    }

    #[test]
    fn test_duplicate_uuid_last_name_wins() {
        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let template = template(&tmpl_dir, "{{ short_id }}");

        let mut store = UserStore::new();
        store.insert("alice".to_string(), record("shared", "01"));
        store.insert("zoe".to_string(), record("shared", "02"));

        let summary = generate(&store, &template, &[], "sni", out_dir.path());
        assert_eq!(summary.succeeded, 2);

        let files: Vec<_> = fs::read_dir(out_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        // BTreeMap iterates alice then zoe; zoe's render is on disk.
        let content = fs::read_to_string(out_dir.path().join("shared.yaml")).unwrap();
        assert_eq!(content, "02");
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let template = template(&tmpl_dir, "{{ uuid }}:{{ sni_host }}");
        let mut store = UserStore::new();
        store.insert("alice".to_string(), record("aaa", "01"));

        generate(&store, &template, &[], "sni", out_dir.path());
        let first = fs::read(out_dir.path().join("aaa.yaml")).unwrap();

        generate(&store, &template, &[], "sni", out_dir.path());
        let second = fs::read(out_dir.path().join("aaa.yaml")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_store_is_a_noop() {
        let tmpl_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let template = template(&tmpl_dir, "{{ uuid }}");

        let summary = generate(&UserStore::new(), &template, &[], "sni", out_dir.path());
        assert_eq!(summary, RunSummary::default());
        assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }
}
