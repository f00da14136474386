// Administrator routes: user management and platform totals. Every handler
// takes the AdminUser extractor.

pub mod handlers;
