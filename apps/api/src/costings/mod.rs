// Company-scoped costing catalog. A job's costings are the active catalog
// entries for the job's company; the customer's selection is recorded on
// the quote.

pub mod catalog;
pub mod handlers;
pub mod totals;
