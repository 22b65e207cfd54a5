//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    ledger::ExpenseEntry,
};

const TABLE_DATA_CELL_STYLE: &str = "text-right whitespace-nowrap";

/// Renders every entry in the ledger, oldest first.
pub(super) fn expense_history_table(entries: &[ExpenseEntry]) -> Markup {
    html! {
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Expense History" }

            div
                id="expense-history-table"
                class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            @for header in ["Food", "Fuel", "Groceries", "Other", "Savings"] {
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} {
                                    (header)
                                }
                            }
                        }
                    }
                    tbody {
                        @for entry in entries {
                            tr class=(TABLE_ROW_STYLE) {
                                th scope="row" class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                    (entry.date)
                                }
                                @for amount in [entry.food, entry.fuel, entry.groceries, entry.other] {
                                    td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                        (format_currency(amount))
                                    }
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " text-green-600 dark:text-green-400"} {
                                    (format_currency(entry.savings))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
