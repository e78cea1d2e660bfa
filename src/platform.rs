use std::fmt;

/// E-commerce platforms the classifier can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Shopify,
    WooCommerce,
    Magento,
    SalesforceCommerceCloud,
    SapCommerceCloud,
    OracleCommerceCloud,
    BigCommerce,
    Commercetools,
    PrestaShop,
    Wix,
    Squarespace,
    OpenCart,
    WordPress,
    /// No rule matched.
    Unidentified,
}

impl Platform {
    /// The label written to the history store.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shopify => "Shopify",
            Self::WooCommerce => "WooCommerce",
            Self::Magento => "Magento",
            Self::SalesforceCommerceCloud => "Salesforce Commerce Cloud",
            Self::SapCommerceCloud => "SAP Commerce Cloud",
            Self::OracleCommerceCloud => "Oracle Commerce Cloud",
            Self::BigCommerce => "BigCommerce",
            Self::Commercetools => "Commercetools",
            Self::PrestaShop => "PrestaShop",
            Self::Wix => "Wix",
            Self::Squarespace => "Squarespace",
            Self::OpenCart => "OpenCart",
            Self::WordPress => "WordPress",
            Self::Unidentified => "Unidentified",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
