use chrono::DateTime;
use serde::Deserialize;

use rumor_core::{ClickSample, Link};

use super::{UpstreamError, check_status, http_client};
use crate::ports::LinkService;

const OK: &[u16] = &[200, 201];

/// Client for the Bitly v4 API: shortens feedback links and reports how
/// often they were clicked.
pub struct Bitly {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct Group {
    guid: String,
    #[serde(default)]
    role: String,
}

#[derive(Deserialize)]
struct Groups {
    groups: Vec<Group>,
}

#[derive(Deserialize)]
struct Links {
    links: Vec<Link>,
}

#[derive(Deserialize)]
struct RawClick {
    clicks: u64,
    date: String,
}

#[derive(Deserialize)]
struct LinkClicks {
    link_clicks: Vec<RawClick>,
}

impl Bitly {
    pub fn new(api_url: &str, access_token: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_url)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;
        Ok(check_status("GET", response, OK)?.json().await?)
    }
}

impl LinkService for Bitly {
    async fn shorten(&self, url: &str, title: &str) -> Result<Link, UpstreamError> {
        let body = serde_json::json!({ "long_url": url, "title": title });
        let response = self
            .client
            .post(self.url("/shorten"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Ok(check_status("POST", response, OK)?.json().await?)
    }

    async fn group_id(&self) -> Result<String, UpstreamError> {
        let groups: Groups = self.get("/groups", &[]).await?;
        groups
            .groups
            .into_iter()
            .find(|g| g.role == "org-admin")
            .map(|g| g.guid)
            .ok_or(UpstreamError::MissingGroup)
    }

    async fn list_links(&self, group_id: &str, since: u64) -> Result<Vec<Link>, UpstreamError> {
        let links: Links = self
            .get(
                &format!("/groups/{group_id}/bitlinks"),
                &[("created_after", since.to_string())],
            )
            .await?;
        Ok(links.links)
    }

    async fn clicks(
        &self,
        link_id: &str,
        unit: &str,
        units: u32,
    ) -> Result<Vec<ClickSample>, UpstreamError> {
        let clicks: LinkClicks = self
            .get(
                &format!("/bitlinks/{link_id}/clicks"),
                &[("unit", unit.to_string()), ("units", units.to_string())],
            )
            .await?;
        clicks
            .link_clicks
            .into_iter()
            .map(|c| {
                Ok(ClickSample {
                    clicks: c.clicks,
                    at: parse_click_date(&c.date)?,
                })
            })
            .collect()
    }
}

/// Click buckets are dated like `2026-02-21T13:00:00+0000`; RFC 3339 is
/// accepted as well.
fn parse_click_date(date: &str) -> Result<u64, UpstreamError> {
    DateTime::parse_from_rfc3339(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .and_then(|at| u64::try_from(at.timestamp()).ok())
        .ok_or_else(|| UpstreamError::Decode(format!("bad click date {date:?}")))
}
