use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use toyssl_core::{
    handshake::{ClientConfig, ClientHandshake, EstablishedSession, ServerConfig, ServerHandshake},
    protocol::{CipherSuiteDirectory, SuiteFilter},
    trace::{Direction, Explanation, LogTrace, TraceSink},
};
use toyssl_net_tokio::{accept_tcp, bind_first_free, connect_tcp, serve_stream, ConnectOptions, DEFAULT_HOST};
use toyssl_pki::{load_certificate_chain, load_dh_params, load_private_key, X509Decoder};

const HEX_LINE: usize = 32;

#[derive(Parser)]
#[command(name = "toyssl", version, about = "SSLv3 / TLS 1.0 DHE_RSA handshake, narrated step by step")]
struct Cli {
    // -v for debug, -vv for trace. RUST_LOG overrides both.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    // Send the narration through the logger (debug level) instead of stdout
    #[arg(long, default_value_t = false, global = true)]
    log_only: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    // Listen on the first free port in range and handshake with every client.
    Server {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, default_value_t = 9000)]
        first_port: u16,

        #[arg(long, default_value_t = 9999)]
        last_port: u16,

        /// PEM certificate chain, leaf first
        #[arg(long, default_value = "server.crt")]
        cert: PathBuf,

        /// PEM RSA private key (PKCS#8 or PKCS#1)
        #[arg(long, default_value = "server.key")]
        key: PathBuf,

        /// PEM DH parameters
        #[arg(long, default_value = "dhp.pem")]
        dh_params: PathBuf,

        // Exit after the first handshake
        #[arg(long, default_value_t = false)]
        once: bool,
    },

    // Connect, run the handshake and print the master secret.
    Client {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, default_value_t = 9000)]
        port: u16,

        #[arg(long, default_value_t = 500)]
        connect_timeout_ms: u64,
    },

    // List the cipher-suite directory.
    Suites {
        // Only suites with an ephemeral key exchange
        #[arg(long, default_value_t = false)]
        pfs: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let trace = trace_sink(cli.log_only);

    match cli.cmd {
        Command::Server { host, first_port, last_port, cert, key, dh_params, once } => {
            let config = load_server_config(&cert, &key, &dh_params)?;
            run_server(host, first_port, last_port, config, trace, once).await
        }
        Command::Client { host, port, connect_timeout_ms } => {
            run_client(host, port, Duration::from_millis(connect_timeout_ms), trace).await
        }
        Command::Suites { pfs } => {
            list_suites(pfs);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn trace_sink(log_only: bool) -> Arc<dyn TraceSink> {
    if log_only {
        Arc::new(LogTrace)
    } else {
        Arc::new(ConsoleTrace)
    }
}

fn load_server_config(cert: &Path, key: &Path, dh_params: &Path) -> Result<ServerConfig> {
    let chain = load_certificate_chain(cert).with_context(|| format!("loading certificate {}", cert.display()))?;
    let key = load_private_key(key).with_context(|| format!("loading private key {}", key.display()))?;
    let dh = load_dh_params(dh_params).with_context(|| format!("loading DH parameters {}", dh_params.display()))?;
    Ok(ServerConfig::new(chain, key, dh))
}

async fn run_server(
    host: String,
    first_port: u16,
    last_port: u16,
    config: ServerConfig,
    trace: Arc<dyn TraceSink>,
    once: bool,
) -> Result<()> {
    let listener = bind_first_free(&host, first_port..=last_port)
        .await
        .with_context(|| format!("failed to bind {host}:{first_port}..={last_port}"))?;
    println!("toyssl server listening on {}", listener.local_addr()?);

    if once {
        let hs = ServerHandshake::new(config, trace.clone());
        let conn = accept_tcp(&listener, hs, trace, ConnectOptions::default()).await.context("handshake failed")?;
        print_session(conn.session());
        return Ok(());
    }

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        tracing::info!(%peer, "client connected");

        let hs = ServerHandshake::new(config.clone(), trace.clone());
        let trace = trace.clone();
        tokio::spawn(async move {
            match serve_stream(stream, hs, trace, ConnectOptions::default()).await {
                Ok(conn) => print_session(conn.session()),
                Err(e) => tracing::warn!(%peer, error = %e, "handshake failed"),
            }
        });
    }
}

async fn run_client(host: String, port: u16, connect_timeout: Duration, trace: Arc<dyn TraceSink>) -> Result<()> {
    let addr = format!("{host}:{port}");
    let hs = ClientHandshake::new(ClientConfig::default(), Arc::new(X509Decoder::new()), trace.clone());
    let opts = ConnectOptions { connect_timeout, ..ConnectOptions::default() };

    let conn = connect_tcp(&addr, hs, trace, opts).await.with_context(|| format!("handshake with {addr} failed"))?;
    print_session(conn.session());
    Ok(())
}

fn list_suites(pfs_only: bool) {
    let filter = SuiteFilter { pfs: pfs_only.then_some(true), ..SuiteFilter::default() };
    for suite in CipherSuiteDirectory::filter(&filter) {
        if let Some(info) = CipherSuiteDirectory::lookup(suite) {
            println!(
                "{:#06x}  {:<45} kex={:?} auth={:?} cipher={:?}-{} mode={:?} mac={:?}",
                suite.code(),
                suite.name(),
                info.kex,
                info.auth,
                info.cipher,
                info.key_bits,
                info.mode,
                info.mac
            );
        }
    }
}

fn print_session(session: &EstablishedSession) {
    println!(
        "established {} {} (PRF {:?})\n  master secret {}",
        session.version,
        session.cipher_suite,
        session.prf,
        hex::encode(session.master_secret)
    );
}

// Narrates the handshake on stdout: each message and each crypto step, hex dumped.
struct ConsoleTrace;

impl ConsoleTrace {
    fn dump(bytes: &[u8]) {
        for line in bytes.chunks(HEX_LINE) {
            println!("      {}", hex::encode(line));
        }
    }
}

impl TraceSink for ConsoleTrace {
    fn on_message(&self, direction: Direction, label: &str, bytes: &[u8]) {
        println!("{} {} ({} bytes)", direction.arrow(), label, bytes.len());
        Self::dump(bytes);
    }

    fn explain(&self, explanation: &Explanation) {
        println!("== {}", explanation.title);
        for (label, value) in &explanation.entries {
            println!("   {label} ({} bytes)", value.len());
            Self::dump(value);
        }
    }
}
