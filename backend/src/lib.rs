pub mod catchers;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use rocket::{Build, Rocket, catchers, routes};
use routes::AppState;

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/api",
            routes![
                routes::init_ledger,
                routes::cast_vote,
                routes::vote_exists,
                routes::get_vote,
                routes::tally_votes,
                routes::tally_report
            ],
        )
        .register(
            "/",
            catchers![
                catchers::bad_request,
                catchers::not_found,
                catchers::unprocessable_entity,
                catchers::internal_error
            ],
        )
}
