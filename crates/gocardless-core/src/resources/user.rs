//! Users: the customers paying bills.

resource_type!(
    User,
    User,
    "A customer of a merchant.\n\nUsers carry only the common `created_at` date field."
);
