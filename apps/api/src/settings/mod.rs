// Per-company presentation configuration: branding, hero content, and
// editable copy blocks. Read by the portal pages, written by staff.

pub mod handlers;
