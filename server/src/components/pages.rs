use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{html, Render as _};

use crate::auth::SessionUser;
use crate::components::layout::{Card, Page};
use crate::components::profile::{card_list, post_list, profile_header, profile_tabs, ProfileTab};
use crate::components::ui::avatar::Avatar;
use crate::components::ui::flash::FlashList;
use crate::components::ui::heading::Heading;
use crate::profile::ProfileContext;
use crate::store::{PostRecord, UserRecord};

/// The generic not-found page, used for every profile-scoped miss.
pub fn not_found() -> Response {
    let content = html! {
        div class="text-center px-8 py-12" {
            (Heading::h1("Whoops, we cannot find that page.").render())
            p class="text-gray-600" {
                "You can always visit the " a href="/" class="text-orange-700 underline" { "homepage" }
                " to get a fresh start."
            }
        }
    };

    let page = Page::new(
        "Not Found - Quill".to_string(),
        Box::new(Card::new(content).with_max_width("max-w-lg")),
    );

    (StatusCode::NOT_FOUND, page).into_response()
}

/// Landing page for anonymous visitors: login form, registration form, and
/// any pending flash messages.
pub fn guest_home(errors: Vec<String>, reg_errors: Vec<String>) -> Page {
    let content = html! {
        div class="px-8 py-8" {
            (FlashList::new(errors).render())

            (Heading::h1("Remember Writing?").render())
            p class="text-gray-600 mb-6" {
                "Are you sick of short tweets and impersonal feeds? "
                "Quill is an exclusive platform for sharing your thoughts in full. Sign up today!"
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-8" {
                div {
                    (Heading::h3("Sign In").render())
                    form method="post" action="/login" class="space-y-3" {
                        input type="text" name="username" placeholder="Username" autocomplete="username"
                            class="w-full border rounded-md px-3 py-2 text-sm";
                        input type="password" name="password" placeholder="Password" autocomplete="current-password"
                            class="w-full border rounded-md px-3 py-2 text-sm";
                        button type="submit" class="w-full py-2 rounded-md bg-gray-700 text-white text-sm" {
                            "Sign In"
                        }
                    }
                }

                div {
                    (Heading::h3("Sign Up").render())
                    (FlashList::new(reg_errors).render())
                    form method="post" action="/register" class="space-y-3" {
                        input type="text" name="username" id="username-register" placeholder="Pick a username"
                            class="w-full border rounded-md px-3 py-2 text-sm";
                        input type="text" name="email" id="email-register" placeholder="you@example.com"
                            class="w-full border rounded-md px-3 py-2 text-sm";
                        input type="password" name="password" placeholder="Create a password"
                            class="w-full border rounded-md px-3 py-2 text-sm";
                        button type="submit" class="w-full py-2 rounded-md bg-orange-600 text-white text-sm" {
                            "Sign Up for Quill"
                        }
                    }
                }
            }
        }
    };

    Page::new(
        "Quill - a small writing community".to_string(),
        Box::new(Card::new(content).with_max_width("max-w-3xl")),
    )
}

/// Home feed for a signed-in visitor.
pub fn dashboard(user: &SessionUser, posts: &[PostRecord]) -> Page {
    let content = html! {
        div class="flex items-center gap-3 px-6 py-4 border-b border-gray-100" {
            (Avatar::new(&user.avatar_url, &user.username).size("w-10 h-10").render())
            span class="font-semibold text-gray-800" { (user.username) }

            form method="post" action="/logout" class="ml-auto" {
                button type="submit" class="text-sm text-gray-500 hover:text-gray-800" { "Sign Out" }
            }
        }

        @if posts.is_empty() {
            div class="px-6 py-10 text-center" {
                (Heading::h2("Your feed is empty").render())
                p class="text-sm text-gray-500" {
                    "Follow some writers and their latest posts will show up here."
                }
            }
        } @else {
            div class="px-6 py-3 text-sm text-gray-500" {
                "The latest from those you follow"
            }
            (post_list(posts))
        }
    };

    Page::new(
        "Your Feed - Quill".to_string(),
        Box::new(Card::new(content).with_max_width("max-w-2xl")),
    )
}

/// One of the three profile screens, bundling the fetched list with the
/// relationship flags and counts.
pub fn profile_screen(
    owner: &UserRecord,
    ctx: &ProfileContext,
    visitor: Option<&SessionUser>,
    tab: ProfileTab<'_>,
) -> Page {
    let list = match &tab {
        ProfileTab::Posts(posts) => post_list(posts),
        ProfileTab::Followers(cards) => card_list(cards),
        ProfileTab::Following(cards) => card_list(cards),
    };

    let content = html! {
        (profile_header(owner, ctx, visitor.is_some()))
        (profile_tabs(&owner.username, tab.slug(), ctx))
        (list)
    };

    Page::new(
        format!("Profile for {} - Quill", owner.username),
        Box::new(Card::new(content).with_max_width("max-w-2xl")),
    )
}
