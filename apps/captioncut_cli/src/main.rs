use anyhow::{Context, Result};
use captioncut_core::{EditorSession, EditorSettings, Project};
use clap::Parser;

mod cli;
mod ops;

fn init_tracing(cli_override_level: Option<&str>) {
    let filter = match cli_override_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_apply(cmd: cli::ApplyCmd) -> Result<()> {
    let mut project = Project::load_from_file(&cmd.project)
        .with_context(|| format!("failed to load project {}", cmd.project.display()))?;
    if let Some(path) = &cmd.settings {
        project.settings = EditorSettings::load_from_file(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?;
    }
    let ops = ops::load_ops(&cmd.ops)?;

    let mut session = EditorSession::from_project(project)
        .with_context(|| format!("invalid project {}", cmd.project.display()))?;
    let report = ops::apply_all(&mut session, &ops)?;

    tracing::info!(
        applied = report.applied,
        skipped = report.skipped,
        clips = session.clips().len(),
        unsaved = session.has_unsaved_changes(),
        "ops applied"
    );

    let edited = session.to_project();
    match &cmd.output {
        Some(path) => {
            let written = edited
                .save_to_file(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %written.display(), "wrote project");
        }
        None => println!("{}", serde_json::to_string_pretty(&edited)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.log_level.as_deref());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "captioncut starting");

    match args.command {
        cli::Command::Apply(cmd) => run_apply(cmd),
        cli::Command::PrintDefaultSettings => {
            let s = serde_json::to_string_pretty(&EditorSettings::default())?;
            println!("{s}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn apply_writes_edited_project() {
        let dir = TempDir::new().unwrap();
        let project_path = dir.path().join("talk.captioncut");
        let ops_path = dir.path().join("ops.json");
        let out_path = dir.path().join("edited.captioncut");

        let mut project = Project::new("Talk", EditorSettings::default());
        project.clips = ["a", "b", "c"]
            .iter()
            .map(|id| {
                captioncut_core::Clip::from_words(
                    *id,
                    "",
                    vec![captioncut_core::Word::new(format!("{}_w", id), *id, 0.0, 1.0)],
                )
            })
            .collect();
        project.save_to_file(&project_path).unwrap();
        std::fs::write(
            &ops_path,
            r#"[{"op":"delete_clip","clip_id":"a"},{"op":"reorder","source_id":"c","target_id":"b"}]"#,
        )
        .unwrap();

        run_apply(cli::ApplyCmd {
            project: project_path,
            ops: ops_path,
            output: Some(out_path.clone()),
            settings: None,
        })
        .unwrap();

        let edited = Project::load_from_file(&out_path).unwrap();
        let ids: Vec<&str> = edited.clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(edited.clips[0].timeline, "1");
        assert_eq!(edited.id, project.id);
    }

    #[test]
    fn apply_fails_on_missing_project() {
        let dir = TempDir::new().unwrap();
        let err = run_apply(cli::ApplyCmd {
            project: dir.path().join("nope.captioncut"),
            ops: dir.path().join("ops.json"),
            output: None,
            settings: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("failed to load project"));
    }
}
