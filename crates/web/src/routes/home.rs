//! Home page route handler.
//!
//! The marketing page is static content. The only per-request input is the
//! testimonial the carousel should show.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentAccount;

// =============================================================================
// Static Content
// =============================================================================

/// Headline number in the stats band.
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct HowItWorksStep {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Testimonial {
    pub name: &'static str,
    pub role: &'static str,
    pub content: &'static str,
}

pub struct PricingPlan {
    pub name: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub highlighted: bool,
}

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

static STATS: [Stat; 4] = [
    Stat { value: "10,000+", label: "Businesses" },
    Stat { value: "2M+", label: "Reviews collected" },
    Stat { value: "4.8", label: "Average rating" },
    Stat { value: "230%", label: "More positive reviews" },
];

static FEATURES: [Feature; 6] = [
    Feature {
        title: "Automated review requests",
        description: "Send email and SMS requests at the right moment after every visit.",
    },
    Feature {
        title: "Review gating",
        description: "Ask for a rating first and route happy customers to your public review page.",
    },
    Feature {
        title: "One dashboard",
        description: "Monitor Google, Facebook, Yelp and TripAdvisor reviews in one place.",
    },
    Feature {
        title: "Smart responses",
        description: "Reply to every review with suggested responses for positive and negative feedback.",
    },
    Feature {
        title: "Website widgets",
        description: "Show your best reviews on your own site, filtered by rating and platform.",
    },
    Feature {
        title: "Multi-location",
        description: "Manage every branch with per-location links and reporting.",
    },
];

static HOW_IT_WORKS: [HowItWorksStep; 3] = [
    HowItWorksStep {
        number: 1,
        title: "Register your business",
        description: "Tell us about your business and connect your review profiles.",
    },
    HowItWorksStep {
        number: 2,
        title: "Share your review link",
        description: "Send your ReviewHUT link by email, SMS or QR code after each visit.",
    },
    HowItWorksStep {
        number: 3,
        title: "Grow your rating",
        description: "Happy customers leave public reviews; unhappy ones come to you first.",
    },
];

/// Carousel testimonials, in display order.
pub static TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Sarah Johnson",
        role: "Owner, The Beauty Spa",
        content: "ReviewHUT has completely transformed our customer feedback process. We've seen a 230% increase in positive reviews within just three months of using the platform.",
    },
    Testimonial {
        name: "Michael Chen",
        role: "Director, Chen's Restaurant Group",
        content: "Managing reviews across our 5 restaurant locations used to be a nightmare. Now with ReviewHUT, we can monitor and respond to all reviews from one dashboard. Our overall rating has increased from 3.8 to 4.6!",
    },
    Testimonial {
        name: "Jennifer Williams",
        role: "Marketing Manager, City Dental",
        content: "The automated review collection campaigns have been a game-changer for us. We're now collecting 5x more reviews than before, and our new patients frequently mention they chose us because of our stellar online reviews.",
    },
];

static PRICING: [PricingPlan; 3] = [
    PricingPlan {
        name: "Starter",
        price: "$29",
        description: "For a single location getting started with reviews.",
        features: &["1 location", "100 review requests/month", "Review gating", "Email support"],
        highlighted: false,
    },
    PricingPlan {
        name: "Professional",
        price: "$79",
        description: "For growing businesses that want more reviews.",
        features: &[
            "Up to 3 locations",
            "500 review requests/month",
            "Website widgets",
            "Priority support",
        ],
        highlighted: true,
    },
    PricingPlan {
        name: "Enterprise",
        price: "$199",
        description: "For multi-location brands.",
        features: &[
            "Unlimited locations",
            "Unlimited review requests",
            "Centralized management",
            "Dedicated account manager",
        ],
        highlighted: false,
    },
];

static FAQS: [Faq; 8] = [
    Faq {
        question: "How does ReviewHUT collect reviews?",
        answer: "ReviewHUT sends automated email and SMS requests to your customers asking them to leave a review. You can customize the timing, frequency, and template of these requests to maximize your review collection efforts.",
    },
    Faq {
        question: "Which review platforms do you support?",
        answer: "We support all major review platforms including Google, Facebook, Yelp, TripAdvisor, and 100+ industry-specific sites. You can connect all your profiles and monitor them in one dashboard.",
    },
    Faq {
        question: "Can I respond to reviews from ReviewHUT?",
        answer: "Yes, you can respond to all reviews from our platform. We also provide response suggestions to help you craft the perfect response to both positive and negative reviews.",
    },
    Faq {
        question: "How do I display reviews on my website?",
        answer: "ReviewHUT offers customizable widgets that you can embed on your website to showcase your best reviews. You can filter by rating, platform, and more to display only the reviews you want.",
    },
    Faq {
        question: "Do you have a mobile app?",
        answer: "Yes, we have mobile apps for both iOS and Android so you can manage your reviews on the go. You'll receive real-time notifications when you get new reviews and can respond directly from the app.",
    },
    Faq {
        question: "How long is the free trial?",
        answer: "We offer a 14-day free trial for all paid plans. No credit card is required to start your trial, and you can cancel anytime.",
    },
    Faq {
        question: "Can I use ReviewHUT for multiple locations?",
        answer: "Yes, ReviewHUT supports multi-location businesses. Our Professional plan includes up to 3 locations, and our Enterprise plan offers unlimited locations with centralized management.",
    },
    Faq {
        question: "Is there a limit to how many review requests I can send?",
        answer: "Each plan has a monthly limit of review requests you can send. The Starter plan includes 100 requests/month, the Professional plan includes 500 requests/month, and the Enterprise plan offers unlimited requests.",
    },
];

// =============================================================================
// Carousel
// =============================================================================

/// Which testimonial is showing and where the arrows lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    pub current: usize,
    pub previous: usize,
    pub next: usize,
}

impl Carousel {
    /// Position `requested` in a carousel of `len` slides, wrapping both ways.
    #[must_use]
    pub const fn at(requested: usize, len: usize) -> Self {
        if len == 0 {
            return Self {
                current: 0,
                previous: 0,
                next: 0,
            };
        }
        let current = requested % len;
        Self {
            current,
            previous: (current + len - 1) % len,
            next: (current + 1) % len,
        }
    }
}

/// Query parameters for the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub testimonial: Option<usize>,
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub account: Option<CurrentAccount>,
    pub stats: &'static [Stat],
    pub features: &'static [Feature],
    pub steps: &'static [HowItWorksStep],
    pub testimonial: &'static Testimonial,
    pub carousel: Carousel,
    /// One entry per slide: whether it is the current one.
    pub dots: Vec<bool>,
    pub plans: &'static [PricingPlan],
    pub faqs: &'static [Faq],
}

/// Display the home page (also served at `/pricing`).
#[instrument(skip(account))]
pub async fn home(
    OptionalAuth(account): OptionalAuth,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let carousel = Carousel::at(query.testimonial.unwrap_or(0), TESTIMONIALS.len());
    let testimonial = TESTIMONIALS
        .get(carousel.current)
        .unwrap_or(&TESTIMONIALS[0]);

    HomeTemplate {
        account,
        stats: &STATS,
        features: &FEATURES,
        steps: &HOW_IT_WORKS,
        testimonial,
        carousel,
        dots: (0..TESTIMONIALS.len()).map(|i| i == carousel.current).collect(),
        plans: &PRICING,
        faqs: &FAQS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_wraps_forward_and_back() {
        let first = Carousel::at(0, 3);
        assert_eq!((first.previous, first.next), (2, 1));

        let last = Carousel::at(2, 3);
        assert_eq!((last.previous, last.next), (1, 0));
    }

    #[test]
    fn test_carousel_clamps_out_of_range_index() {
        assert_eq!(Carousel::at(7, 3).current, 1);
        assert_eq!(Carousel::at(5, 0).current, 0);
    }
}
