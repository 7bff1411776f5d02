mod bulk_follow_up_actions;
mod create_follow_up;
mod delete_follow_up;
mod get_follow_up;
mod get_follow_up_reminders;
mod get_follow_ups;
mod update_follow_up;

use actix_web::web;
use bulk_follow_up_actions::bulk_follow_up_actions_controller;
use create_follow_up::create_follow_up_controller;
use delete_follow_up::delete_follow_up_controller;
use get_follow_up::get_follow_up_controller;
use get_follow_up_reminders::get_follow_up_reminders_controller;
use get_follow_ups::get_follow_ups_controller;
use update_follow_up::update_follow_up_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/follow-ups", web::post().to(create_follow_up_controller));
    cfg.route("/follow-ups", web::get().to(get_follow_ups_controller));

    // Must come before the `{follow_up_id}` routes
    cfg.route(
        "/follow-ups/reminders",
        web::get().to(get_follow_up_reminders_controller),
    );
    cfg.route(
        "/follow-ups/bulk-actions",
        web::post().to(bulk_follow_up_actions_controller),
    );

    cfg.route(
        "/follow-ups/{follow_up_id}",
        web::get().to(get_follow_up_controller),
    );
    cfg.route(
        "/follow-ups/{follow_up_id}",
        web::put().to(update_follow_up_controller),
    );
    cfg.route(
        "/follow-ups/{follow_up_id}",
        web::delete().to(delete_follow_up_controller),
    );
}
