//! # ログ出力の初期化
//!
//! `tracing-subscriber` の設定をまとめる。出力形式は `LOG_FORMAT`
//! （`json` / `pretty`）、フィルタは `RUST_LOG` で上書きできる。
//!
//! `RUST_LOG` が無いときのフィルタは `DEBUG` フラグで変わる。
//! `DEBUG` が真なら sqlx が発行した SQL も出力する。

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 大文字小文字と前後の空白は無視する。解釈できなければ `None`。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "" => Some(Self::Pretty),
            _ => None,
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    ///
    /// 解釈できない値は [`Pretty`](LogFormat::Pretty) として扱い、stderr に警告する。
    /// subscriber の初期化前に呼ばれるため tracing は使わない。
    pub fn from_env() -> Self {
        let Ok(raw) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        Self::parse(&raw).unwrap_or_else(|| {
            eprintln!("WARNING: LOG_FORMAT={raw:?} は解釈できないため pretty で出力します");
            Self::default()
        })
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールド
    pub service_name: String,
    pub log_format:   LogFormat,
    /// SQL ログを出すか
    pub debug:        bool,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat, debug: bool) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            debug,
        }
    }

    /// `LOG_FORMAT` を環境変数から読み、`debug` は呼び出し側の設定を使う
    pub fn from_env(service_name: impl Into<String>, debug: bool) -> Self {
        Self::new(service_name, LogFormat::from_env(), debug)
    }

    /// `RUST_LOG` 未設定時のフィルタ
    ///
    /// ワークスペースのクレートはすべて `todo_` で始まるため、`todo` の
    /// 前方一致でまとめて debug にする。
    pub fn default_filter(&self) -> String {
        let sqlx = if self.debug {
            "sqlx::query=debug"
        } else {
            "sqlx=warn"
        };
        ["info", "todo=debug", "tower_http=debug", sqlx].join(",")
    }

    /// プロセス全体を包むスパン
    #[cfg(feature = "observability")]
    pub fn root_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// グローバル subscriber を登録する
///
/// `tracing_error::ErrorLayer` も登録するので、インフラ層のエラーは
/// 生成時点の `SpanTrace` を保持できる。2 回目以降の呼び出しはパニックする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{
        EnvFilter,
        Layer as _,
        fmt,
        layer::SubscriberExt,
        util::SubscriberInitExt,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let output = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// HTTP リクエスト単位のスパン
///
/// `TraceLayer::make_span_with` に渡す。クエリ文字列はログに残さない。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = request.uri().path(),
    )
}
