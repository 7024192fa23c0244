//! Atom + GeoRSS document for recently shared plans.
//!
//! Every entry is built before the first chunk is handed out, so a plan that
//! cannot be encoded fails the whole render instead of truncating the feed.

use std::borrow::Cow;
use std::io::Write;

use crate::config::{CompatMode, FeedConfig};
use crate::domain::{MissingGeometry, PlanRecord};
use crate::errors::PlanFeedResult;
use crate::render::clock::{format_timestamp, Clock};
use crate::render::routes::UrlResolver;
use crate::render::templates::{render_block, EntryTemplate, GmlPoint, HeaderTemplate};
use crate::render::wms::GetMapUrl;
use crate::render::xml_text;

pub const CONTENT_TYPE: &str = "application/atom+xml";

pub const FEED_ID: &str = "urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6";
pub const FEED_TITLE: &str = "Recently Shared Plans from DistrictBuilder";
pub const FEED_SUBTITLE: &str = "The latest redistricting plans shared on DistrictBuilder";
pub const AUTHOR_NAME: &str = "Community Contributors to DistrictBuilder";
pub const AUTHOR_EMAIL: &str = "support@publicmapping.org";

const ENTRY_ID_PREFIX: &str = "urn:publicmapping:plan:";
/// Historical feeds gave every entry this id
pub const LEGACY_ENTRY_ID: &str = "urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a";

pub const POINT_SRS: &str = "urn:ogc:def:crs:EPSG::3785";
pub const LEGACY_POINT_SRS: &str = "urn:ogc:def:crs:EPSG:6.6:3875";

const FEED_FOOTER: &str = "</feed>\n";

pub type MissingGeometryHook = Box<dyn Fn(&MissingGeometry) + Send + Sync>;

fn log_missing_geometry(missing: &MissingGeometry) {
    tracing::warn!(plan_id = missing.plan_id(), "{}", missing);
}

pub struct FeedRenderer<R: UrlResolver, C: Clock> {
    compat: CompatMode,
    get_map: GetMapUrl,
    resolver: R,
    clock: C,
    on_missing_geometry: MissingGeometryHook,
}

impl<R: UrlResolver, C: Clock> FeedRenderer<R, C> {
    /// Fails with a configuration error before any plan is looked at
    pub fn new(config: &FeedConfig, resolver: R, clock: C) -> PlanFeedResult<Self> {
        config.validate()?;
        let get_map = GetMapUrl::new(config)?;

        Ok(Self {
            compat: config.compat,
            get_map,
            resolver,
            clock,
            on_missing_geometry: Box::new(log_missing_geometry),
        })
    }

    /// Replace the default handler (a warning log) for plans lacking geometry
    pub fn with_missing_geometry_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&MissingGeometry) + Send + Sync + 'static,
    {
        self.on_missing_geometry = Box::new(hook);
        self
    }

    /// Render the whole feed into one string
    pub fn render(&self, plans: &[PlanRecord]) -> PlanFeedResult<String> {
        Ok(self.chunks(plans)?.collect())
    }

    /// Stream the feed into `writer`
    pub fn write_to<W: Write>(&self, plans: &[PlanRecord], mut writer: W) -> PlanFeedResult<()> {
        for chunk in self.chunks(plans)? {
            writer.write_all(chunk.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// The feed as a sequence of text chunks: header, one per entry, footer.
    ///
    /// Missing geometry is reported to the hook only once every entry has
    /// rendered, so a failed feed reports nothing.
    pub fn chunks(&self, plans: &[PlanRecord]) -> PlanFeedResult<FeedChunks> {
        let mut entries = Vec::with_capacity(plans.len());
        let mut missing = Vec::new();
        for plan in plans {
            let (entry, gap) = self.render_entry(plan)?;
            entries.push(entry);
            missing.extend(gap);
        }
        let header = self.render_header()?;

        for gap in &missing {
            (self.on_missing_geometry)(gap);
        }

        tracing::debug!(
            entries = entries.len(),
            missing_geometry = missing.len(),
            "rendered plan feed"
        );

        Ok(FeedChunks {
            header: Some(header),
            entries: entries.into_iter(),
            footer: Some(FEED_FOOTER),
        })
    }

    fn render_header(&self) -> PlanFeedResult<String> {
        let feed_url = self.resolver.feed_url();
        xml_text::check("feed_url", &feed_url)?;

        render_block(&HeaderTemplate {
            title: FEED_TITLE,
            subtitle: FEED_SUBTITLE,
            feed_url: &feed_url,
            updated: format_timestamp(&self.clock.now()),
            author_name: AUTHOR_NAME,
            author_email: AUTHOR_EMAIL,
            id: FEED_ID,
        })
    }

    /// One `<entry>`, plus the geometry it had to leave out
    fn render_entry(
        &self,
        plan: &PlanRecord,
    ) -> PlanFeedResult<(String, Option<MissingGeometry>)> {
        let permalink = self.resolver.permalink(plan.id);
        xml_text::check("name", &plan.name)?;
        xml_text::check("permalink", &permalink)?;

        let (image_src, point, missing) = match &plan.last_changed_district {
            Some(district) => {
                let src = self.get_map.for_district(district.id);
                match district.usable_centroid() {
                    Some(centroid) => {
                        let point = GmlPoint {
                            srs: self.point_srs(),
                            lat: centroid.y,
                            lon: centroid.x,
                        };
                        (Some(src), Some(point), None)
                    }
                    None => {
                        let missing = MissingGeometry::Centroid {
                            plan_id: plan.id,
                            district_id: district.id,
                        };
                        (Some(src), None, Some(missing))
                    }
                }
            }
            None => (None, None, Some(MissingGeometry::District { plan_id: plan.id })),
        };

        let entry = render_block(&EntryTemplate {
            title: &plan.name,
            link: &permalink,
            id: self.entry_id(plan),
            updated: format_timestamp(&plan.edited),
            image_src,
            raw_src: self.compat == CompatMode::Legacy,
            point,
        })?;

        Ok((entry, missing))
    }

    fn entry_id(&self, plan: &PlanRecord) -> String {
        match self.compat {
            CompatMode::Standard => format!("{}{}", ENTRY_ID_PREFIX, plan.id),
            CompatMode::Legacy => LEGACY_ENTRY_ID.to_string(),
        }
    }

    fn point_srs(&self) -> &'static str {
        match self.compat {
            CompatMode::Standard => POINT_SRS,
            CompatMode::Legacy => LEGACY_POINT_SRS,
        }
    }
}

/// Lazily yielded pieces of a rendered feed
#[derive(Debug)]
pub struct FeedChunks {
    header: Option<String>,
    entries: std::vec::IntoIter<String>,
    footer: Option<&'static str>,
}

impl FeedChunks {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Iterator for FeedChunks {
    type Item = Cow<'static, str>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(header) = self.header.take() {
            return Some(Cow::Owned(header));
        }
        if let Some(entry) = self.entries.next() {
            return Some(Cow::Owned(entry));
        }
        self.footer.take().map(Cow::Borrowed)
    }
}
