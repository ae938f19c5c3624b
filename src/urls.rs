//! Endpoint and external link lookup.

use url::Url;

use crate::environment::Settings;

const EVENTS_PATH: &str = "events/_search";
const NEWS_PATH: &str = "articles/_search";
const ISSUES_PATH: &str = "issues/_search";

/// Static configuration lookup for every URL the client talks to or links out to.
#[cfg_attr(test, mockall::automock)]
pub trait UrlProvider: Send + Sync {
    fn events_url(&self) -> Url;
    fn news_feed_url(&self) -> Url;
    fn issues_feed_url(&self) -> Url;
    fn volunteer_url(&self) -> Url;
    fn privacy_policy_url(&self) -> Url;
    fn coders_url(&self) -> Url;
    fn designers_url(&self) -> Url;
    fn campaign_site_url(&self) -> Url;
}

/// URLs resolved once from [`Settings`].
#[derive(Debug, Clone)]
pub struct ConfiguredUrlProvider {
    events: Url,
    news_feed: Url,
    issues_feed: Url,
    volunteer: Url,
    privacy_policy: Url,
    coders: Url,
    designers: Url,
    campaign_site: Url,
}

impl ConfiguredUrlProvider {
    pub fn new(settings: &Settings) -> Result<Self, url::ParseError> {
        let search = &settings.search_url;
        let site = &settings.site_url;
        let link = |configured: &Option<Url>, path: &str| match configured {
            Some(url) => Ok(url.clone()),
            None => site.join(path),
        };

        Ok(Self {
            events: search.join(EVENTS_PATH)?,
            news_feed: search.join(NEWS_PATH)?,
            issues_feed: search.join(ISSUES_PATH)?,
            volunteer: link(&settings.volunteer_url, "volunteer")?,
            privacy_policy: link(&settings.privacy_policy_url, "privacy")?,
            coders: link(&settings.coders_url, "coders")?,
            designers: link(&settings.designers_url, "designers")?,
            campaign_site: site.clone(),
        })
    }
}

impl UrlProvider for ConfiguredUrlProvider {
    fn events_url(&self) -> Url {
        self.events.clone()
    }

    fn news_feed_url(&self) -> Url {
        self.news_feed.clone()
    }

    fn issues_feed_url(&self) -> Url {
        self.issues_feed.clone()
    }

    fn volunteer_url(&self) -> Url {
        self.volunteer.clone()
    }

    fn privacy_policy_url(&self) -> Url {
        self.privacy_policy.clone()
    }

    fn coders_url(&self) -> Url {
        self.coders.clone()
    }

    fn designers_url(&self) -> Url {
        self.designers.clone()
    }

    fn campaign_site_url(&self) -> Url {
        self.campaign_site.clone()
    }
}
