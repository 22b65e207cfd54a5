//! The navigation bar shown at the top of pages for logged-in users.

use maud::{Markup, html};

use crate::{endpoints, html::APP_NAME};

/// The pages reachable from the navigation bar, as `(url, title)`.
const LINKS: [(&str, &str); 2] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::LOG_OUT, "Log out"),
];

const LINK_STYLE: &str = "block py-2 px-3 rounded-sm text-gray-900 hover:text-blue-700 \
    dark:text-white dark:hover:text-blue-500";

const CURRENT_LINK_STYLE: &str = "block py-2 px-3 rounded-sm text-blue-700 dark:text-blue-500";

/// A navigation bar that highlights the page the user is on.
pub struct NavBar<'a> {
    current_page: &'a str,
}

impl<'a> NavBar<'a> {
    /// Create a navigation bar for the page at `current_page`.
    ///
    /// The link pointing at `current_page`, if any, is highlighted and gets
    /// `aria-current="page"`.
    pub fn new(current_page: &'a str) -> Self {
        Self { current_page }
    }

    fn is_current(&self, url: &str) -> bool {
        // Logging out is an action, not a page.
        url != endpoints::LOG_OUT && url == self.current_page
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div class="max-w-screen-xl flex items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        (APP_NAME)
                    }

                    ul class="font-medium flex flex-row space-x-4 md:space-x-8"
                    {
                        @for (url, title) in LINKS {
                            @let is_current = self.is_current(url);

                            li {
                                a
                                    href=(url)
                                    class=(if is_current { CURRENT_LINK_STYLE } else { LINK_STYLE })
                                    aria-current=[is_current.then_some("page")]
                                {
                                    (title)
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}
