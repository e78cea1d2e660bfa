//! Heuristic platform detection.
//!
//! Detection walks [`RULES`] top to bottom and stops at the first rule with a matching
//! signal. Order encodes priority between overlapping markers: WooCommerce sits above
//! generic WordPress, and so on.

use anyhow::Context as _;

use crate::cli::ClassifyArgs;
use crate::fetch::{FetchConfig, FetchResult, Fetcher as _, Headers, HttpFetcher};
use crate::platform::Platform;

/// Where a signal is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haystack {
    /// Page text, lower-cased.
    Text,
    /// Header names, lower-cased and space-joined.
    HeaderKeys,
    /// Header values, lower-cased and space-joined.
    HeaderValues,
    /// The source URL as given (case preserved).
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub haystack: Haystack,
    pub needle: &'static str,
}

const fn text(needle: &'static str) -> Signal {
    Signal {
        haystack: Haystack::Text,
        needle,
    }
}

const fn header_key(needle: &'static str) -> Signal {
    Signal {
        haystack: Haystack::HeaderKeys,
        needle,
    }
}

const fn header_value(needle: &'static str) -> Signal {
    Signal {
        haystack: Haystack::HeaderValues,
        needle,
    }
}

const fn url(needle: &'static str) -> Signal {
    Signal {
        haystack: Haystack::Url,
        needle,
    }
}

/// A platform and the signals that identify it. Any one signal is enough.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub platform: Platform,
    pub signals: &'static [Signal],
}

impl Rule {
    pub fn matches(&self, haystacks: &Haystacks<'_>) -> bool {
        self.signals.iter().any(|signal| haystacks.contains(signal))
    }
}

/// Detection rules in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        platform: Platform::Shopify,
        signals: &[
            text("cdn.shopify.com"),
            text(".myshopify.com"),
            text("shopify.theme"),
            text("content=\"shopify\""),
            header_key("x-shopify-"),
            header_value("x-shopify-"),
        ],
    },
    Rule {
        platform: Platform::WooCommerce,
        signals: &[
            text("woocommerce"),
            text("/wp-content/plugins/woocommerce"),
            header_key("woocommerce"),
            header_value("woocommerce"),
        ],
    },
    Rule {
        platform: Platform::Magento,
        signals: &[
            text("mage.js"),
            text("var mage"),
            text("magento"),
            text("/skin/frontend/"),
        ],
    },
    Rule {
        platform: Platform::SalesforceCommerceCloud,
        signals: &[
            text("demandware"),
            text("bmcdn.net"),
            text("salesforce"),
            text("sfcc"),
            text("dwstatic"),
        ],
    },
    Rule {
        platform: Platform::SapCommerceCloud,
        signals: &[
            text("hybris"),
            text("yaccelerator"),
            text("spartacus"),
            text("/occ/v"),
            text("/rest/v"),
            text("sap-commerce"),
            text("sap commerce"),
        ],
    },
    Rule {
        platform: Platform::OracleCommerceCloud,
        signals: &[
            text("oracle"),
            text("occ-commercestore"),
            text("oraclecloud"),
        ],
    },
    Rule {
        platform: Platform::BigCommerce,
        signals: &[text("bigcommerce")],
    },
    Rule {
        platform: Platform::Commercetools,
        signals: &[text("commercetools")],
    },
    Rule {
        platform: Platform::PrestaShop,
        signals: &[text("prestashop"), header_value("prestashop")],
    },
    Rule {
        platform: Platform::Wix,
        signals: &[text("wix.com"), text("wixstatic")],
    },
    Rule {
        platform: Platform::Squarespace,
        signals: &[text("squarespace")],
    },
    Rule {
        platform: Platform::OpenCart,
        signals: &[text("opencart"), url("index.php?route=")],
    },
    Rule {
        platform: Platform::WordPress,
        signals: &[text("wp-content"), text("wp-include")],
    },
];

/// The lower-cased search spaces derived from one fetch.
#[derive(Debug, Clone)]
pub struct Haystacks<'a> {
    text: String,
    header_keys: String,
    header_values: String,
    url: &'a str,
}

impl<'a> Haystacks<'a> {
    pub fn new(text: &str, headers: &Headers, url: &'a str) -> Self {
        let header_keys = headers
            .keys()
            .map(|key| key.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let header_values = headers
            .values()
            .map(|value| value.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            text: text.to_lowercase(),
            header_keys,
            header_values,
            url,
        }
    }

    pub fn contains(&self, signal: &Signal) -> bool {
        let haystack = match signal.haystack {
            Haystack::Text => self.text.as_str(),
            Haystack::HeaderKeys => self.header_keys.as_str(),
            Haystack::HeaderValues => self.header_values.as_str(),
            Haystack::Url => self.url,
        };
        haystack.contains(signal.needle)
    }
}

/// Returns the first platform whose rule matches, or [`Platform::Unidentified`].
///
/// Total over all inputs. Absent text means the fetch failed, which always yields the
/// fallback, whatever the headers or URL say.
pub fn classify(text: Option<&str>, headers: &Headers, url: &str) -> Platform {
    let Some(text) = text else {
        return Platform::Unidentified;
    };
    let haystacks = Haystacks::new(text, headers, url);
    RULES
        .iter()
        .find(|rule| rule.matches(&haystacks))
        .map_or(Platform::Unidentified, |rule| rule.platform)
}

pub fn classify_fetch(fetched: &FetchResult) -> Platform {
    classify(
        fetched.text.as_deref(),
        &fetched.headers,
        &fetched.source_url,
    )
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let config = FetchConfig::from_env()
        .context("load fetch config")?
        .with_timeout_secs(args.timeout_secs);
    let fetcher = HttpFetcher::open(config).context("open http fetcher")?;

    let fetched = fetcher.fetch(&args.url).await;
    let platform = classify_fetch(&fetched);
    fetcher.close().await.context("close http fetcher")?;

    if fetched.text.is_none() {
        tracing::warn!(url = %args.url, "no page data; classification fell back");
    }
    println!("{platform}");
    Ok(())
}
