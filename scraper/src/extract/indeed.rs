use common::ListingRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{first_attr, first_text, resolve, selector, text_of};

pub(super) const BASE_URL: &str = "https://www.indeed.com";
const SOURCE: &str = "Indeed";

// Search results
static CARD: Lazy<Selector> = Lazy::new(|| selector("div.job_seen_beacon"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h2.jobTitle"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static COMPANY: Lazy<Selector> = Lazy::new(|| selector("span.companyName"));
static LOCATION: Lazy<Selector> = Lazy::new(|| selector("div.companyLocation"));
static NEXT: Lazy<Selector> = Lazy::new(|| selector(r#"a[aria-label="Next Page"][href]"#));

// Detail page
static D_TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.jobsearch-JobInfoHeader-title"));
static D_COMPANY: Lazy<Selector> = Lazy::new(|| selector("div.jobsearch-CompanyInfoContainer"));
static D_LOCATION: Lazy<Selector> = Lazy::new(|| selector("div.jobsearch-JobInfoHeader-subtitle"));
static D_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("div#jobDescriptionText"));
static D_METADATA: Lazy<Selector> = Lazy::new(|| selector("div.jobsearch-JobMetadataHeader-item"));

pub(super) fn listing_stubs(page: &Html) -> Vec<ListingRecord> {
    page.select(&CARD)
        .filter_map(|card| {
            // Cards without a linked title are ads or placeholders
            let title = card.select(&TITLE).next()?;
            let href = first_attr(title, &TITLE_LINK, "href")?;
            let url = resolve(BASE_URL, href)?;

            Some(ListingRecord {
                title: text_of(title),
                company: first_text(card, &COMPANY),
                location: first_text(card, &LOCATION),
                url,
                source: SOURCE.to_string(),
                ..Default::default()
            })
        })
        .collect()
}

pub(super) fn details(page: &Html, url: &str) -> ListingRecord {
    let root = page.root_element();

    let salary = root
        .select(&D_METADATA)
        .map(text_of)
        .find(|text| text.to_lowercase().contains("salary"))
        .unwrap_or_default();

    ListingRecord {
        title: first_text(root, &D_TITLE),
        company: first_text(root, &D_COMPANY),
        location: first_text(root, &D_LOCATION),
        description: first_text(root, &D_DESCRIPTION),
        salary,
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
        <html><body>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><a href="/viewjob?jk=abc">Senior   Rust
              Engineer</a></h2>
            <span class="companyName">Ferrous Systems</span>
            <div class="companyLocation">Remote</div>
          </div>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><a href="https://www.indeed.com/viewjob?jk=def">Backend Dev</a></h2>
          </div>
          <div class="job_seen_beacon">
            <h2 class="jobTitle">Sponsored, no link</h2>
          </div>
          <a aria-label="Next Page" href="/jobs?q=rust&amp;start=10">Next</a>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
          <h1 class="jobsearch-JobInfoHeader-title">Senior Rust Engineer</h1>
          <div class="jobsearch-CompanyInfoContainer">Ferrous Systems</div>
          <div class="jobsearch-JobInfoHeader-subtitle">Berlin, Germany</div>
          <div class="jobsearch-JobMetadataHeader-item">Full-time</div>
          <div class="jobsearch-JobMetadataHeader-item">Salary: $120,000 - $150,000 a year</div>
          <div id="jobDescriptionText"><p>Join our   amazing team.</p><p>Great benefits.</p></div>
        </body></html>
    "#;

    #[test]
    fn stubs_need_a_linked_title() {
        let stubs = listing_stubs(&Html::parse_document(SEARCH));
        assert_eq!(stubs.len(), 2);

        assert_eq!(stubs[0].title, "Senior Rust Engineer");
        assert_eq!(stubs[0].company, "Ferrous Systems");
        assert_eq!(stubs[0].location, "Remote");
        assert_eq!(stubs[0].url, "https://www.indeed.com/viewjob?jk=abc");
        assert_eq!(stubs[0].source, "Indeed");

        assert_eq!(stubs[1].company, "");
        assert_eq!(stubs[1].location, "");
    }

    #[test]
    fn details_pick_the_salary_item() {
        let d = details(&Html::parse_document(DETAIL), "https://www.indeed.com/viewjob?jk=abc");
        assert_eq!(d.location, "Berlin, Germany");
        assert_eq!(d.salary, "Salary: $120,000 - $150,000 a year");
        assert_eq!(d.description, "Join our amazing team. Great benefits.");
        assert_eq!(d.job_type, "");
    }

    #[test]
    fn next_page_is_absolute() {
        assert_eq!(
            next_page(&Html::parse_document(SEARCH)).as_deref(),
            Some("https://www.indeed.com/jobs?q=rust&start=10")
        );
        assert_eq!(next_page(&Html::parse_document(DETAIL)), None);
    }

    #[test]
    fn extraction_is_deterministic() {
        let a = listing_stubs(&Html::parse_document(SEARCH));
        let b = listing_stubs(&Html::parse_document(SEARCH));
        assert_eq!(a, b);
    }
}
