use clap::Parser;

/// This is a browsing and tabulation program for classroom sociogram surveys.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the survey (roster, response folder, questions) in JSON format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The roster of the course. Setting this option overrides the roster given in the
    /// configuration.
    #[clap(long, value_parser)]
    pub roster: Option<String>,

    /// (default json) The type of the roster file: json, csv or xlsx.
    #[clap(long, value_parser)]
    pub roster_type: Option<String>,

    /// (directory path) The folder containing one JSON response file per student. Setting this option overrides
    /// the folder given in the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// If passed as an argument, prints the loading status and the menus of students and questions.
    /// This is the default when no other view is requested.
    #[clap(long, takes_value = false)]
    pub list: bool,

    /// (display name) Shows all the answers of a student.
    #[clap(short, long, value_parser)]
    pub student: Option<String>,

    /// (question key) Shows the summary of a question.
    #[clap(short, long, value_parser)]
    pub question: Option<String>,

    /// (value, requires --question) Lists the students who chose this value for the question.
    #[clap(long, value_parser)]
    pub option: Option<String>,

    /// (index starting at 0, requires --question) Lists the students behind the given bar of the chart,
    /// bars being sorted by decreasing count.
    #[clap(long, value_parser)]
    pub bar: Option<usize>,

    /// (file path, 'stdout' or empty) If specified, the summary of all the questions will be written in JSON
    /// format to the given location. By default, it goes to the output directory of the configuration;
    /// an empty value turns the output off.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, sociogram will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
