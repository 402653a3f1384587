use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

const FEED: &str = r#"<rss version="2.0"><channel><title>Demo</title>
<item><title>News</title><link>https://x.test/1</link><guid>g1</guid>
<pubDate>Tue, 14 May 2024 17:05:00 +0000</pubDate>
<description>&lt;p&gt;Big &lt;i&gt;news&lt;/i&gt;&lt;/p&gt;</description></item>
</channel></rss>"#;

fn bin_path() -> PathBuf {
    if let Some(path) = env::var_os("CARGO_BIN_EXE_feedmark") {
        return PathBuf::from(path);
    }
    let exe = env::current_exe().expect("current exe");
    let mut debug_dir = exe.as_path();
    while let Some(parent) = debug_dir.parent() {
        if parent.file_name().and_then(|name| name.to_str()) == Some("debug") {
            let candidate = parent.join("feedmark");
            if candidate.exists() {
                return candidate;
            }
        }
        debug_dir = parent;
    }
    panic!("binary path missing");
}

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("path")
}

#[test]
fn convert_prints_text_then_bare_links() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = temp_file(
        &dir,
        "fragment.html",
        "<p>Hi <b>all</b></p><a href=\"https://x.test\"></a>",
    );
    let output = Command::new(bin_path())
        .args(["convert", path_arg(&input)])
        .output()
        .expect("run");

    assert!(output.status.success(), "expected success exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "\n\nHi **all**\n\n \nhttps://x.test\n");
}

#[test]
fn convert_reads_stdin_and_prints_json() {
    let mut child = Command::new(bin_path())
        .args(["convert", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"<a href=\"https://x.test\">click</a>")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success(), "expected success exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "{\"text\":\"[click](https://x.test) \",\"bareLinks\":[]}"
    );
}

#[test]
fn convert_can_flush_unterminated_links() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = temp_file(&dir, "open.html", "<a href=\"https://x.test\">tail");
    let output = Command::new(bin_path())
        .args(["convert", "--flush-unterminated", path_arg(&input)])
        .output()
        .expect("run");

    assert!(output.status.success(), "expected success exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "[tail](https://x.test) \n");
}

#[test]
fn convert_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(bin_path())
        .args(["convert", path_arg(&dir.path().join("absent.html"))])
        .output()
        .expect("run");

    assert!(!output.status.success(), "expected error exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "expected read error");
}

#[test]
fn digest_seeds_then_announces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let feed = temp_file(&dir, "feed.xml", FEED);
    let archive = dir.path().join("archive.txt");

    let output = Command::new(bin_path())
        .args(["digest", path_arg(&feed), "--archive", path_arg(&archive)])
        .output()
        .expect("run");
    assert!(output.status.success(), "expected success exit code");
    assert!(output.stdout.is_empty(), "first run only seeds");
    assert_eq!(fs::read_to_string(&archive).expect("archive"), "g1\n");

    fs::write(&archive, "other\n").expect("reset archive");
    let output = Command::new(bin_path())
        .args([
            "digest",
            path_arg(&feed),
            "--archive",
            path_arg(&archive),
            "--summary",
            "--utc",
        ])
        .output()
        .expect("run");
    assert!(output.status.success(), "expected success exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("\"username\":\"Demo\""));
    assert!(stdout.contains("Tue, May 14, 2024 @ 05:05 PM +00:00"));
    assert!(stdout.contains("\"description\":\"Big _news_\""));
}

#[test]
fn digest_rejects_malformed_feed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let feed = temp_file(&dir, "broken.xml", "<rss><channel>");
    let output = Command::new(bin_path())
        .args([
            "digest",
            path_arg(&feed),
            "--archive",
            path_arg(&dir.path().join("archive.txt")),
        ])
        .output()
        .expect("run");

    assert!(!output.status.success(), "expected error exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse feed"));
}

#[test]
fn source_prints_group_url() {
    let output = Command::new(bin_path())
        .args(["source", "group", "tf2"])
        .output()
        .expect("run");

    assert!(output.status.success(), "expected success exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "https://steamcommunity.com/groups/tf2/rss/");
}
