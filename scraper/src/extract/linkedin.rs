use common::ListingRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{first_attr, first_text, resolve, selector, text_of};

pub(super) const BASE_URL: &str = "https://www.linkedin.com";
const SOURCE: &str = "LinkedIn";

static CARD: Lazy<Selector> = Lazy::new(|| selector("div.base-card"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h3.base-search-card__title"));
static CARD_LINK: Lazy<Selector> = Lazy::new(|| selector("a.base-card__full-link[href]"));
static ANY_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static COMPANY: Lazy<Selector> = Lazy::new(|| selector("h4.base-search-card__subtitle"));
static LOCATION: Lazy<Selector> = Lazy::new(|| selector("span.job-search-card__location"));
static SALARY: Lazy<Selector> = Lazy::new(|| selector("span.job-search-card__salary-info"));
static NEXT: Lazy<Selector> = Lazy::new(|| {
    selector(r#"button[aria-label="Next"][href], a[aria-label="Next"][href]"#)
});

static D_TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.top-card-layout__title"));
static D_COMPANY: Lazy<Selector> = Lazy::new(|| selector("a.topcard__org-name-link"));
static D_LOCATION: Lazy<Selector> = Lazy::new(|| selector("span.topcard__flavor--bullet"));
static D_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("div.show-more-less-html__markup"));
static D_CRITERIA: Lazy<Selector> =
    Lazy::new(|| selector("span.description__job-criteria-text"));

pub(super) fn listing_stubs(page: &Html) -> Vec<ListingRecord> {
    page.select(&CARD)
        .filter_map(|card| {
            let title = card.select(&TITLE).next()?;
            let href = first_attr(card, &CARD_LINK, "href")
                .or_else(|| first_attr(title, &ANY_LINK, "href"))?;
            let url = resolve(BASE_URL, href)?;

            Some(ListingRecord {
                title: text_of(title),
                company: first_text(card, &COMPANY),
                location: first_text(card, &LOCATION),
                salary: first_text(card, &SALARY),
                url,
                source: SOURCE.to_string(),
                ..Default::default()
            })
        })
        .collect()
}

pub(super) fn details(page: &Html, url: &str) -> ListingRecord {
    let root = page.root_element();
    let criteria: Vec<String> = root.select(&D_CRITERIA).map(text_of).collect();

    // Criteria come as [job type, posted date, ...]; a lone entry is ambiguous
    let (job_type, posted_date) = match criteria.as_slice() {
        [job_type, posted, ..] => (job_type.clone(), posted.clone()),
        _ => (String::new(), String::new()),
    };

    ListingRecord {
        title: first_text(root, &D_TITLE),
        company: first_text(root, &D_COMPANY),
        location: first_text(root, &D_LOCATION),
        description: first_text(root, &D_DESCRIPTION),
        job_type,
        posted_date,
        url: url.to_string(),
        source: SOURCE.to_string(),
        ..Default::default()
    }
}

pub(super) fn next_page(page: &Html) -> Option<String> {
    let href = first_attr(page.root_element(), &NEXT, "href")?;
    resolve(BASE_URL, href)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"
        <html><body><ul>
          <li><div class="base-card">
            <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/111"></a>
            <h3 class="base-search-card__title">Platform Engineer</h3>
            <h4 class="base-search-card__subtitle"><a>Oxide</a></h4>
            <span class="job-search-card__location">Emeryville, CA</span>
            <span class="job-search-card__salary-info">$150K - $180K</span>
          </div></li>
          <li><div class="base-card">
            <h3 class="base-search-card__title"><a href="/jobs/view/222">Data Intern</a></h3>
          </div></li>
          <li><div class="base-card"><h3 class="base-search-card__title">No link</h3></div></li>
        </ul>
        <a aria-label="Next" href="/jobs/search/?keywords=rust&amp;start=25">Next</a>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <h1 class="top-card-layout__title">Platform Engineer</h1>
          <a class="topcard__org-name-link">  Oxide  </a>
          <span class="topcard__flavor--bullet">Emeryville, CA</span>
          <div class="show-more-less-html__markup">Build great   computers.</div>
          <span class="description__job-criteria-text">Full-time</span>
          <span class="description__job-criteria-text">2 days ago</span>
          <span class="description__job-criteria-text">Engineering</span>
        </body></html>
    "#;

    #[test]
    fn stubs_use_card_link_or_title_anchor() {
        let stubs = listing_stubs(&Html::parse_document(SEARCH));
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].url, "https://www.linkedin.com/jobs/view/111");
        assert_eq!(stubs[0].company, "Oxide");
        assert_eq!(stubs[0].salary, "$150K - $180K");
        assert_eq!(stubs[1].title, "Data Intern");
        assert_eq!(stubs[1].url, "https://www.linkedin.com/jobs/view/222");
    }

    #[test]
    fn criteria_fill_job_type_and_posted_date() {
        let d = details(&Html::parse_document(DETAIL), "https://www.linkedin.com/jobs/view/111");
        assert_eq!(d.company, "Oxide");
        assert_eq!(d.description, "Build great computers.");
        assert_eq!(d.job_type, "Full-time");
        assert_eq!(d.posted_date, "2 days ago");
        assert_eq!(d.salary, "");
    }

    #[test]
    fn single_criterion_is_ignored() {
        let html = r#"<span class="description__job-criteria-text">Full-time</span>"#;
        let d = details(&Html::parse_document(html), "u");
        assert_eq!(d.job_type, "");
        assert_eq!(d.posted_date, "");
    }

    #[test]
    fn next_page_accepts_anchor_fallback() {
        assert_eq!(
            next_page(&Html::parse_document(SEARCH)).as_deref(),
            Some("https://www.linkedin.com/jobs/search/?keywords=rust&start=25")
        );
    }
}
