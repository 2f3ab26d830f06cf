use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
fn upload_without_bucket_name_fails_before_touching_s3() {
    // Run from an empty directory so no .env file is picked up.
    let workdir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("raw-uploader").expect("Binary exists");

    cmd.current_dir(workdir.path())
        .arg("upload")
        .env_remove("AWS_S3_BUCKET_NAME")
        .env("AWS_DEFAULT_REGION", "us-east-2");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("AWS_S3_BUCKET_NAME"))
        .stdout(predicate::str::contains("Bucket:").not());
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("raw-uploader").expect("Binary exists");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("upload").and(predicate::str::contains("verify")));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
#[serial]
async fn emits_trace_initialised_event_even_when_config_fails() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use raw_uploader::cli::{run, Cli, Commands};

    std::env::remove_var("AWS_S3_BUCKET_NAME");
    let cli = Cli {
        command: Commands::Verify {
            config: None,
            prefix: None,
            json: false,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err(), "verify without a bucket name must fail");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
