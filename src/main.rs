mod cli;
mod db;
mod deriver;
mod error;
mod fmt;
mod matcher;
mod models;
mod reports;
mod settings;
mod store;

use clap::{CommandFactory, Parser};

use cli::{
    CategoriesCommands, Cli, Commands, ExpensesCommands, ExportCommands, ReceiptsCommands,
    ReportCommands, RulesCommands, UsersCommands, VendorsCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            data_dir,
            username,
            email,
        } => cli::init::run(data_dir, &username, &email),
        Commands::Users { command } => match command {
            UsersCommands::Add { username, email } => cli::users::add(&username, &email),
            UsersCommands::List => cli::users::list(),
            UsersCommands::Switch { username } => cli::users::switch(&username),
            UsersCommands::Delete { username } => cli::users::delete(&username),
        },
        Commands::Vendors { command } => match command {
            VendorsCommands::Add {
                name,
                address,
                phone,
                email,
                tax_identifier,
            } => cli::vendors::add(
                &name,
                address.as_deref(),
                phone.as_deref(),
                email.as_deref(),
                tax_identifier.as_deref(),
            ),
            VendorsCommands::List => cli::vendors::list(),
            VendorsCommands::Show { name } => cli::vendors::show(&name),
            VendorsCommands::Delete { name } => cli::vendors::delete(&name),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name, description } => {
                cli::categories::add(&name, description.as_deref())
            }
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Rename { name, new_name } => {
                cli::categories::rename(&name, &new_name)
            }
            CategoriesCommands::Delete { name } => cli::categories::delete(&name),
        },
        Commands::Rules { command } => match command {
            RulesCommands::Add {
                pattern,
                category,
                threshold,
                position,
            } => cli::rules::add(&pattern, &category, threshold, position),
            RulesCommands::List => cli::rules::list(),
            RulesCommands::Update {
                id,
                pattern,
                category,
                threshold,
                position,
            } => cli::rules::update(id, pattern.as_deref(), category.as_deref(), threshold, position),
            RulesCommands::Delete { id } => cli::rules::delete(id),
        },
        Commands::Receipts { command } => match command {
            ReceiptsCommands::Add {
                merchant,
                amount,
                date,
                vendor,
                notes,
            } => cli::receipts::add(&merchant, amount, date.as_deref(), &vendor, notes.as_deref()),
            ReceiptsCommands::List => cli::receipts::list(),
        },
        Commands::Expenses { command } => match command {
            ExpensesCommands::Add {
                amount,
                date,
                description,
                category,
                vendor,
            } => cli::expenses::add(
                amount,
                date.as_deref(),
                description.as_deref(),
                category.as_deref(),
                vendor.as_deref(),
            ),
            ExpensesCommands::List {
                status,
                category,
                from_date,
                to_date,
            } => cli::expenses::list(
                status.as_deref(),
                category.as_deref(),
                from_date.as_deref(),
                to_date.as_deref(),
            ),
            ExpensesCommands::Approve { id } => cli::expenses::approve(id),
            ExpensesCommands::Reject { id } => cli::expenses::reject(id),
            ExpensesCommands::Delete { id } => cli::expenses::delete(id),
        },
        Commands::Report { command } => match command {
            ReportCommands::Dashboard => cli::report::dashboard(),
            ReportCommands::ByDate { from_date, to_date } => cli::report::by_date(from_date, to_date),
            ReportCommands::ByCategory { from_date, to_date } => {
                cli::report::by_category(from_date, to_date)
            }
            ReportCommands::ByVendor { from_date, to_date } => {
                cli::report::by_vendor(from_date, to_date)
            }
            ReportCommands::ByStatus { from_date, to_date } => {
                cli::report::by_status(from_date, to_date)
            }
            ReportCommands::TopVendors {
                limit,
                from_date,
                to_date,
            } => cli::report::top_vendors(limit, from_date, to_date),
            ReportCommands::VendorTransactions {
                vendor,
                from_date,
                to_date,
            } => cli::report::vendor_transactions(&vendor, from_date, to_date),
            ReportCommands::CategoryTrends { months } => cli::report::category_trends(months),
            ReportCommands::CategorySummary { from_date, to_date } => {
                cli::report::category_summary(from_date, to_date)
            }
            ReportCommands::UnprocessedReceipts => cli::report::unprocessed_receipts(),
            ReportCommands::ReceiptsByDate { from_date, to_date } => {
                cli::report::receipts_by_date(from_date, to_date)
            }
            ReportCommands::MonthlyTrends { months } => cli::report::monthly_trends(months),
            ReportCommands::YearComparison { year } => cli::report::year_comparison(year),
            ReportCommands::Summary { from_date, to_date } => {
                cli::report::summary(from_date, to_date)
            }
        },
        Commands::Export { command } => match command {
            ExportCommands::ByCategory {
                from_date,
                to_date,
                output,
            } => cli::export::by_category(from_date, to_date, &output),
            ExportCommands::ByVendor {
                from_date,
                to_date,
                output,
            } => cli::export::by_vendor(from_date, to_date, &output),
            ExportCommands::MonthlyTrends { months, output } => {
                cli::export::monthly_trends(months, &output)
            }
            ExportCommands::Summary {
                from_date,
                to_date,
                output,
            } => cli::export::summary(from_date, to_date, &output),
        },
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tally", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
