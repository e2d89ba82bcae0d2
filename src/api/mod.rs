use rocket::Route;

pub mod participant;
pub mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(participant::routes());
    routes.extend(voting::routes());
    routes
}
