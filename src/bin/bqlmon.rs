//! bqlmon - Live terminal dashboard for Linux Byte Queue Limits.
//!
//! Usage:
//!   bqlmon                 # monitor eth0, refresh every 10 ms
//!   bqlmon -i enp3s0 -f 100
//!   bqlmon --log-file /tmp/bqlmon.log -v

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use bqlmon::collector::{InterfaceProbe, QueueRegistry, RealFs};
use bqlmon::tui::App;

/// Poll frequency used when none (or zero) is given.
const DEFAULT_POLL_MS: u64 = 10;

/// Live terminal dashboard for Linux Byte Queue Limits.
#[derive(Parser)]
#[command(name = "bqlmon", about = "Byte Queue Limits monitor", version)]
struct Args {
    /// Network interface to monitor.
    #[arg(short, long, default_value = "eth0")]
    interface: String,

    /// Poll frequency in milliseconds (0 means the default).
    #[arg(short, long, value_name = "MSECS", default_value_t = DEFAULT_POLL_MS)]
    frequency: u64,

    /// Path to sysfs (for testing against a copied tree).
    #[arg(long, default_value = "/sys")]
    sys_path: PathBuf,

    /// Path to procfs (for testing against a copied tree).
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// Write logs to this file. The dashboard owns the terminal, so there is no console logging.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn poll_interval(&self) -> Duration {
        let ms = if self.frequency == 0 {
            DEFAULT_POLL_MS
        } else {
            self.frequency
        };
        Duration::from_millis(ms)
    }
}

/// Initializes file logging when `--log-file` is given.
fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let file = File::create(path)
        .map_err(|e| format!("cannot create log file {}: {}", path.display(), e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;

    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    init_logging(args)?;

    let poll_interval = args.poll_interval();
    info!(
        "bqlmon {} starting: interface={}, poll={}ms",
        env!("CARGO_PKG_VERSION"),
        args.interface,
        poll_interval.as_millis()
    );

    let fs = RealFs::new();
    let probe = InterfaceProbe::new(fs, &args.sys_path, &args.proc_path);
    let info = probe.probe(&args.interface)?;
    info!(
        queues = info.queue_count,
        driver = ?info.driver.as_ref().map(ToString::to_string),
        "interface found"
    );

    let registry = QueueRegistry::create(&fs, &args.sys_path, &info.name, info.queue_count)?;

    App::new(registry, &info, poll_interval).run()?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Failures are reported on stderr; the exit status stays 0 either way.
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["bqlmon"]);
        assert_eq!(args.interface, "eth0");
        assert_eq!(args.poll_interval(), Duration::from_millis(10));
        assert_eq!(args.sys_path, PathBuf::from("/sys"));
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from(["bqlmon", "-i", "enp3s0", "-f", "250", "-vv"]);
        assert_eq!(args.interface, "enp3s0");
        assert_eq!(args.poll_interval(), Duration::from_millis(250));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_zero_frequency_falls_back() {
        let args = Args::parse_from(["bqlmon", "--frequency", "0"]);
        assert_eq!(args.poll_interval(), Duration::from_millis(DEFAULT_POLL_MS));
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("bqlmon.log");
        let args = Args::parse_from(["bqlmon", "-v", "--log-file", log.to_str().unwrap()]);

        init_logging(&args).unwrap();
        info!("written to file");
        assert!(log.exists());
    }

    /// Lays out a Linux 6.1 `/proc` and an empty `/sys` under `root`.
    fn linux_tree(root: &Path) {
        let kernel = root.join("proc/sys/kernel");
        fs::create_dir_all(&kernel).unwrap();
        fs::write(kernel.join("ostype"), "Linux\n").unwrap();
        fs::write(kernel.join("osrelease"), "6.1.0-18-amd64\n").unwrap();
        fs::create_dir_all(root.join("sys/class/net")).unwrap();
    }

    fn args_for(root: &Path, iface: &str) -> Args {
        let sys = root.join("sys");
        let proc = root.join("proc");
        Args::parse_from([
            "bqlmon",
            "-i",
            iface,
            "--sys-path",
            sys.to_str().unwrap(),
            "--proc-path",
            proc.to_str().unwrap(),
        ])
    }

    #[test]
    fn test_missing_interface_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        linux_tree(dir.path());

        let err = run(&args_for(dir.path(), "nonexistent0")).unwrap_err();
        assert!(
            err.to_string().contains("no such network device: nonexistent0"),
            "{err}"
        );
    }

    #[test]
    fn test_missing_attribute_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        linux_tree(dir.path());
        let bql = dir
            .path()
            .join("sys/class/net/eth0/queues/tx-0/byte_queue_limits");
        fs::create_dir_all(&bql).unwrap();
        for (name, value) in [
            ("hold_time", "1000"),
            ("inflight", "0"),
            ("limit", "30720"),
            ("limit_max", "1879048192"),
        ] {
            fs::write(bql.join(name), format!("{}\n", value)).unwrap();
        }

        let err = run(&args_for(dir.path(), "eth0")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to initialize queue 0"), "{message}");
        assert!(message.contains("limit_min"), "{message}");
    }
}
