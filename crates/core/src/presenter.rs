use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::vehicle::Vehicle;

/// Maximum number of vehicles shown in a single reply.
pub const RESULT_LIMIT: usize = 5;

/// Which attributes accompany each vehicle line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingStyle {
    /// HTML list with client-side deep links; name and chassis only.
    Availability,
    /// Markdown lines with the daily price.
    Features,
    /// Markdown lines with horsepower, transmission and chassis.
    Specs,
}

impl ListingStyle {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Availability => "Here are some available vehicles:",
            Self::Features => "Here are some cars with those features:",
            Self::Specs => "Here are some vehicles:",
        }
    }
}

/// Shuffles `vehicles` with `rng` and keeps at most `limit` of them.
pub fn shuffle_and_truncate<R>(mut vehicles: Vec<Vehicle>, rng: &mut R, limit: usize) -> Vec<Vehicle>
where
    R: Rng + ?Sized,
{
    vehicles.shuffle(rng);
    vehicles.truncate(limit);
    vehicles
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presenter {
    link_base_url: String,
    limit: usize,
}

impl Presenter {
    pub fn new(link_base_url: impl Into<String>) -> Self {
        let link_base_url = link_base_url.into().trim_end_matches('/').to_string();
        Self { link_base_url, limit: RESULT_LIMIT }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Renders the header followed by one line per vehicle, at most `limit` lines.
    pub fn render(&self, vehicles: &[Vehicle], style: ListingStyle) -> String {
        let visible = vehicles.iter().take(self.limit);
        let mut message = format!("{}\n", style.header());

        match style {
            ListingStyle::Availability => {
                message.push_str("<ul>");
                for vehicle in visible {
                    message.push_str(&format!(
                        "<li><span class='vehicle-link' data-link='{}'>{} ({})</span></li>",
                        vehicle_path(vehicle),
                        vehicle.display_name(),
                        vehicle.chassis
                    ));
                }
                message.push_str("</ul>");
            }
            ListingStyle::Features => {
                for vehicle in visible {
                    message.push_str(&format!(
                        "- [{}]({}): {}€/day\n",
                        vehicle.display_name(),
                        self.vehicle_link(vehicle),
                        vehicle.price_per_day.round_dp(2)
                    ));
                }
            }
            ListingStyle::Specs => {
                for vehicle in visible {
                    message.push_str(&format!(
                        "- [{}]({}): {}hp, {}, {}\n",
                        vehicle.display_name(),
                        self.vehicle_link(vehicle),
                        vehicle.horsepower,
                        vehicle.transmission,
                        vehicle.chassis
                    ));
                }
            }
        }

        message
    }

    pub fn vehicle_link(&self, vehicle: &Vehicle) -> String {
        format!("{}{}", self.link_base_url, vehicle_path(vehicle))
    }
}

fn vehicle_path(vehicle: &Vehicle) -> String {
    format!("/vehicle/{}", vehicle.id)
}
