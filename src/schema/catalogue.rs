//! Built-in category catalogue.

use super::{CategorySchema, ColumnKind, ColumnSpec, DEFAULT_CURRENCY};
use crate::models::ExportCategory;

use ColumnKind::{Date, Display, Integer, Money, Text};

const INVENTORY: &[ColumnSpec] = &[
    ColumnSpec::new("sku", "SKU", Text),
    ColumnSpec::new("name", "Item", Text),
    ColumnSpec::new("item_group", "Group", Text),
    ColumnSpec::new("quantity", "In stock", Integer),
    ColumnSpec::new("unit_price", "Unit price", Money(DEFAULT_CURRENCY)),
    ColumnSpec::new("warehouse", "Warehouse", Text),
    ColumnSpec::new("updated_on", "Last updated", Date),
];

const ISSUED_ITEMS: &[ColumnSpec] = &[
    ColumnSpec::new("issue_id", "Issue no.", Text),
    ColumnSpec::new("item", "Item", Text),
    ColumnSpec::new("serial", "Serial number", Text),
    ColumnSpec::new("recipient", "Recipient", Text),
    ColumnSpec::new("quantity", "Qty", Integer),
    ColumnSpec::new("issued_on", "Issued on", Date),
    ColumnSpec::new("issued_by", "Issued by", Text),
];

const ORDERS: &[ColumnSpec] = &[
    ColumnSpec::new("order_id", "Order no.", Text),
    ColumnSpec::new("customer", "Customer", Text),
    ColumnSpec::new("service", "Service", Text),
    ColumnSpec::new("address", "Address", Text),
    ColumnSpec::new("amount", "Amount", Money(DEFAULT_CURRENCY)),
    ColumnSpec::new("status", "Status", Display),
    ColumnSpec::new("created_on", "Created", Date),
];

const STATISTICS: &[ColumnSpec] = &[
    ColumnSpec::new("metric", "Metric", Text),
    ColumnSpec::new("period", "Period", Text),
    ColumnSpec::new("value", "Value", Integer),
    ColumnSpec::new("change", "Change", Display),
];

const USERS: &[ColumnSpec] = &[
    ColumnSpec::new("user_id", "ID", Integer),
    ColumnSpec::new("full_name", "Full name", Text),
    ColumnSpec::new("role", "Role", Display),
    ColumnSpec::new("phone", "Phone", Text),
    ColumnSpec::new("department", "Department", Text),
    ColumnSpec::new("registered_on", "Registered", Date),
];

const FEEDBACK: &[ColumnSpec] = &[
    ColumnSpec::new("ticket", "Ticket", Text),
    ColumnSpec::new("customer", "Customer", Text),
    ColumnSpec::new("rating", "Rating", Integer),
    ColumnSpec::new("comment", "Comment", Text),
    ColumnSpec::new("channel", "Channel", Display),
    ColumnSpec::new("received_on", "Received", Date),
];

const WORKFLOW: &[ColumnSpec] = &[
    ColumnSpec::new("task_id", "Task", Text),
    ColumnSpec::new("title", "Title", Text),
    ColumnSpec::new("assignee", "Assignee", Text),
    ColumnSpec::new("stage", "Stage", Display),
    ColumnSpec::new("due_on", "Due", Date),
    ColumnSpec::new("priority", "Priority", Display),
];

const CALLS: &[ColumnSpec] = &[
    ColumnSpec::new("call_id", "Call", Text),
    ColumnSpec::new("operator", "Operator", Text),
    ColumnSpec::new("customer_phone", "Customer phone", Text),
    ColumnSpec::new("topic", "Topic", Text),
    ColumnSpec::new("duration_sec", "Duration, s", Integer),
    ColumnSpec::new("outcome", "Outcome", Display),
    ColumnSpec::new("called_on", "Date", Date),
];

/// Title and columns of every category, in catalogue order.
pub const CATEGORY_SCHEMAS: &[CategorySchema] = &[
    CategorySchema {
        category: ExportCategory::Inventory,
        title: "Warehouse inventory",
        columns: INVENTORY,
    },
    CategorySchema {
        category: ExportCategory::IssuedItems,
        title: "Issued equipment",
        columns: ISSUED_ITEMS,
    },
    CategorySchema {
        category: ExportCategory::Orders,
        title: "Customer orders",
        columns: ORDERS,
    },
    CategorySchema {
        category: ExportCategory::Statistics,
        title: "Operational statistics",
        columns: STATISTICS,
    },
    CategorySchema {
        category: ExportCategory::Users,
        title: "Staff directory",
        columns: USERS,
    },
    CategorySchema {
        category: ExportCategory::Feedback,
        title: "Customer feedback",
        columns: FEEDBACK,
    },
    CategorySchema {
        category: ExportCategory::Workflow,
        title: "Workflow tasks",
        columns: WORKFLOW,
    },
    CategorySchema {
        category: ExportCategory::Calls,
        title: "Call-center log",
        columns: CALLS,
    },
];
